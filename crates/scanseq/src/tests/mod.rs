mod errors;
pub(crate) mod utils;
