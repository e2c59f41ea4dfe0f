//! Incremental, pull-based tokenization of byte streams.
//!
//! A [`Scanner`] wraps any [`std::io::Read`] and yields tokens (lines by
//! default) one at a time, reading only as much input as the next token
//! needs. How tokens are delimited is decided by a split function; see
//! [`split`] for the contract and the stock strategies.
//!
//! ```rust
//! use scanseq::{ScanOption, Scanner, split::scan_words};
//!
//! let input = "Now is the winter of our discontent,\nMade glorious summer by this sun of York.\n";
//! let words = Scanner::with_options(input.as_bytes(), [ScanOption::split(scan_words)]);
//! assert_eq!(words.count(), 15);
//! ```

mod buffer;
mod error;
mod options;
mod reader;
mod scanner;
pub mod split;

#[cfg(test)]
mod tests;

pub use error::{ScanError, SplitError};
pub use options::{MAX_TOKEN_SIZE, START_BUFFER_SIZE, ScanOption, ScannerOptions};
pub use scanner::{ScanState, Scanner};
