//! The token scanner: drives the read/split loop and exposes the result as a
//! pull-based sequence.
//!
//! Each pull runs the split function over the unconsumed bytes. Only when it
//! asks for more data does the scanner make room in the buffer and read from
//! the source, so nothing is read that the current token does not need (a
//! single read may still return more bytes than that; they stay buffered for
//! the next pull).
//!
//! State machine
//! - `Ready` -> token -> `Ready`
//! - `Ready` -> need more data at end of input -> `Done`
//! - `Ready` -> final-token sentinel -> (token) -> `Done`
//! - `Ready` -> read/split/limit failure -> error -> `Errored`

use core::{fmt, iter::FusedIterator};
use std::io::Read;

use bstr::{BStr, BString, ByteSlice};
use tracing::{debug, trace};

use crate::{
    ScanError,
    buffer::ScanBuffer,
    options::{ScanOption, ScannerOptions},
    reader::SourceReader,
    split::{Split, SplitFn, scan_lines},
};

/// Tokens returned at end of input without consuming anything before the
/// scanner reports [`ScanError::EmptyTokenLoop`].
const MAX_EMPTY_TOKENS: usize = 100;

/// Where a [`Scanner`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// More tokens may follow.
    Ready,
    /// The sequence ended cleanly.
    Done,
    /// The sequence ended with an error.
    Errored,
}

/// Incremental tokenizer over an [`io::Read`](std::io::Read) source.
///
/// `Scanner` is an [`Iterator`] of `Result<BString, ScanError>`. At most one
/// `Err` is produced and it is always the last item. Stop pulling (or call
/// [`close`](Self::close)) at any point; the source is never read again.
///
/// To keep ownership of the source, pass `&mut reader`.
///
/// ```rust
/// use scanseq::Scanner;
///
/// let input = "golang\npython\r\njava";
/// let lines: Vec<_> = Scanner::new(input.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(lines, ["golang", "python", "java"]);
/// ```
pub struct Scanner<R> {
    reader: SourceReader<R>,
    buffer: ScanBuffer,
    split: SplitFn,
    /// Copy of the most recent token.
    token: Vec<u8>,
    state: ScanState,
    /// Consecutive tokens returned at end of input with no advance.
    empties: usize,
}

impl<R: Read> Scanner<R> {
    /// Creates a line scanner with default sizing.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, core::iter::empty())
    }

    /// Creates a scanner configured by `options`, applied in order.
    #[must_use]
    pub fn with_options<I>(reader: R, options: I) -> Self
    where
        I: IntoIterator<Item = ScanOption>,
    {
        let mut config = ScannerOptions::default();
        let mut seed = None;
        let mut split: SplitFn = Box::new(scan_lines);

        for option in options {
            match option {
                ScanOption::Split(f) => split = f,
                ScanOption::Buffer { buf, max } => {
                    config.max_token_size = max;
                    seed = Some(buf);
                }
                ScanOption::Config(options) => config = options,
            }
        }

        let buffer = match seed {
            Some(buf) => ScanBuffer::seeded(buf, config.initial_capacity, config.max_token_size),
            None => ScanBuffer::new(config.initial_capacity, config.max_token_size),
        };

        Self {
            reader: SourceReader::new(reader),
            buffer,
            split,
            token: Vec::new(),
            state: ScanState::Ready,
            empties: 0,
        }
    }

    /// Produces the next token, borrowed from the scanner.
    ///
    /// Returns `None` once the sequence has ended, either cleanly or after an
    /// error was returned.
    pub fn next_token(&mut self) -> Option<Result<&BStr, ScanError>> {
        match self.scan() {
            Ok(true) => Some(Ok(self.token.as_bstr())),
            Ok(false) => None,
            Err(e) => {
                debug!(error = %e, "scan failed");
                self.finish(ScanState::Errored);
                Some(Err(e))
            }
        }
    }

    /// Runs the read/split loop until a token is ready (`Ok(true)`) or the
    /// sequence is over (`Ok(false)`).
    fn scan(&mut self) -> Result<bool, ScanError> {
        if self.state != ScanState::Ready {
            return Ok(false);
        }

        loop {
            let eof = self.reader.is_eof();

            if eof || !self.buffer.is_empty() {
                let data = self.buffer.unconsumed();
                let available = data.len();
                let step = (self.split)(data, eof).map_err(ScanError::Split)?;

                let advance = step.advance();
                if advance > available {
                    return Err(ScanError::AdvanceTooFar { advance, available });
                }

                let emitted = match step {
                    Split::Token { token, .. }
                    | Split::Final {
                        token: Some(token), ..
                    } => {
                        self.token.clear();
                        self.token.extend_from_slice(token);
                        true
                    }
                    Split::Skip(_) | Split::Final { token: None, .. } => false,
                };
                let last = step.is_final();
                self.buffer.consume(advance);

                if last {
                    trace!(emitted, "final token");
                    self.finish(ScanState::Done);
                    return Ok(emitted);
                }

                if emitted {
                    if !eof || advance > 0 {
                        self.empties = 0;
                    } else {
                        self.empties += 1;
                        if self.empties > MAX_EMPTY_TOKENS {
                            return Err(ScanError::EmptyTokenLoop);
                        }
                    }
                    trace!(len = self.token.len(), advance, "token");
                    return Ok(true);
                }

                if advance > 0 {
                    // Skipped bytes; the rest may already hold a token.
                    continue;
                }

                if eof {
                    self.finish(ScanState::Done);
                    return Ok(false);
                }
            }

            self.buffer.make_room()?;
            let filled = self.reader.fill(&mut self.buffer)?;
            trace!(
                read = filled.read,
                eof = filled.eof,
                buffered = self.buffer.len(),
                capacity = self.buffer.capacity(),
                "filled scan buffer"
            );
        }
    }

    /// Ends the sequence without reading any further.
    ///
    /// Subsequent pulls return `None`. Buffered bytes are discarded.
    pub fn close(&mut self) {
        if self.state == ScanState::Ready {
            self.finish(ScanState::Done);
        }
    }

    fn finish(&mut self, state: ScanState) {
        debug!(?state, "scanner finished");
        self.state = state;
        self.buffer.release();
    }
}

impl<R> Scanner<R> {
    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Bytes read from the source that no token has consumed yet.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.buffer.unconsumed()
    }

    /// Borrows the underlying source.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        self.reader.get_ref()
    }

    /// Gives the source back. Buffered bytes are lost.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<BString, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().map(|res| res.map(ToOwned::to_owned))
    }
}

impl<R: Read> FusedIterator for Scanner<R> {}

impl<R> fmt::Debug for Scanner<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("state", &self.state)
            .field("eof", &self.reader.is_eof())
            .field("buffered", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish_non_exhaustive()
    }
}
