use std::io;

use thiserror::Error;

/// Error type returned by split functions.
///
/// Boxed so a split function can use `?` on whatever validation it performs
/// (number parsing, UTF-8 checks, ...).
pub type SplitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A terminal scanning failure.
///
/// At most one `ScanError` is produced per [`Scanner`](crate::Scanner), and it
/// is always the last item of the sequence.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanError {
    /// The source returned an I/O error. Reported as-is.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The split function rejected the input.
    #[error(transparent)]
    Split(SplitError),

    /// No token boundary was found before the buffer reached its limit.
    #[error("token too long: no boundary within {max} bytes")]
    TooLong {
        /// The largest size the scan buffer was allowed to grow to.
        max: usize,
    },

    /// The split function asked to advance past the data it was given.
    #[error("split function advanced {advance} bytes but only {available} were available")]
    AdvanceTooFar {
        /// Requested advance.
        advance: usize,
        /// Bytes passed to the split function.
        available: usize,
    },

    /// The split function kept producing tokens at end of input without
    /// consuming anything.
    #[error("split function returned too many empty tokens without progressing")]
    EmptyTokenLoop,

    /// The source kept returning no data without reaching end of input.
    #[error("source returned no data after {reads} consecutive reads")]
    NoProgress {
        /// Consecutive reads that returned nothing.
        reads: usize,
    },

    /// The source reported reading more bytes than it was offered.
    #[error("source reported {read} bytes read into a {capacity} byte buffer")]
    BadReadCount {
        /// Count claimed by the source.
        read: usize,
        /// Size of the slice handed to the source.
        capacity: usize,
    },
}

impl ScanError {
    /// Returns `true` if this error signals a misbehaving split function
    /// rather than bad input or a failing source.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::AdvanceTooFar { .. } | Self::EmptyTokenLoop)
    }
}
