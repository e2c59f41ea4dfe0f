use core::fmt;

use crate::split::{SplitFn, SplitResult};

/// Capacity of the scan buffer's first allocation.
pub const START_BUFFER_SIZE: usize = 4096;

/// Default upper bound on the scan buffer, and therefore on token size.
pub const MAX_TOKEN_SIZE: usize = 64 * 1024;

/// Sizing configuration for a [`Scanner`](crate::Scanner).
///
/// These are plain values so an embedding program can load them from its own
/// configuration (enable the `serde` feature).
///
/// # Examples
///
/// ```rust
/// use scanseq::{ScanOption, Scanner, ScannerOptions};
///
/// let options = ScannerOptions {
///     max_token_size: 1024 * 1024,
///     ..Default::default()
/// };
/// let lines = Scanner::with_options(&b"one\ntwo\n"[..], [ScanOption::config(options)]);
/// assert_eq!(lines.count(), 2);
/// ```
///
/// # Default
///
/// [`START_BUFFER_SIZE`] and [`MAX_TOKEN_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScannerOptions {
    /// Size of the first buffer allocation, in bytes.
    ///
    /// Ignored when a buffer is supplied with [`ScanOption::buffer`].
    ///
    /// # Default
    ///
    /// `4096`
    pub initial_capacity: usize,

    /// The largest the scan buffer may grow, in bytes.
    ///
    /// A token (plus its delimiter) that does not fit fails the scan with
    /// [`ScanError::TooLong`](crate::ScanError::TooLong). A supplied buffer
    /// with a larger capacity raises the limit to that capacity.
    ///
    /// # Default
    ///
    /// `65536`
    pub max_token_size: usize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            initial_capacity: START_BUFFER_SIZE,
            max_token_size: MAX_TOKEN_SIZE,
        }
    }
}

/// One construction option for [`Scanner::with_options`](crate::Scanner::with_options).
///
/// Options are applied in order; a later option overrides what an earlier
/// one set.
pub enum ScanOption {
    /// Replace the default line splitting.
    Split(SplitFn),
    /// Start from `buf` and never grow beyond `max` bytes.
    Buffer {
        /// Initial storage. Its whole capacity is used.
        buf: Vec<u8>,
        /// Growth limit.
        max: usize,
    },
    /// Replace the sizing configuration.
    Config(ScannerOptions),
}

impl ScanOption {
    /// Use `split` to find token boundaries.
    #[must_use]
    pub fn split<F>(split: F) -> Self
    where
        F: for<'a> FnMut(&'a [u8], bool) -> SplitResult<'a> + Send + 'static,
    {
        ScanOption::Split(Box::new(split))
    }

    /// Seed the scan buffer with `buf` and cap its growth at `max` bytes.
    #[must_use]
    pub fn buffer(buf: Vec<u8>, max: usize) -> Self {
        ScanOption::Buffer { buf, max }
    }

    /// Apply a sizing configuration.
    #[must_use]
    pub fn config(options: ScannerOptions) -> Self {
        ScanOption::Config(options)
    }
}

impl fmt::Debug for ScanOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOption::Split(_) => f.debug_tuple("Split").finish_non_exhaustive(),
            ScanOption::Buffer { buf, max } => f
                .debug_struct("Buffer")
                .field("capacity", &buf.capacity())
                .field("max", max)
                .finish(),
            ScanOption::Config(options) => f.debug_tuple("Config").field(options).finish(),
        }
    }
}
