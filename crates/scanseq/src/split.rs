//! Split functions: how a [`Scanner`](crate::Scanner) finds token boundaries.
//!
//! A split function receives the unconsumed bytes and a flag telling whether
//! the source is exhausted, and answers with a [`Split`]:
//!
//! - [`Split::Skip`]: no token yet. Advance past some bytes (or none, which
//!   asks for more input).
//! - [`Split::Token`]: a token, plus how many bytes it consumed.
//! - [`Split::Final`]: the last token (if any). The scanner emits it and
//!   ends the sequence cleanly.
//!
//! Errors end the sequence and are handed to the consumer.
//!
//! ```
//! use scanseq::{ScanOption, Scanner, split::Split};
//! use bstr::ByteSlice;
//!
//! // Comma separated fields; a trailing comma yields an empty last field.
//! let fields = Scanner::with_options(
//!     &b"a,b,"[..],
//!     [ScanOption::split(|data, at_eof| {
//!         if let Some(i) = data.find_byte(b',') {
//!             return Ok(Split::token(i + 1, &data[..i]));
//!         }
//!         if at_eof {
//!             return Ok(Split::final_token(data.len(), data));
//!         }
//!         Ok(Split::NEED_MORE)
//!     })],
//! )
//! .collect::<Result<Vec<_>, _>>()
//! .unwrap();
//! assert_eq!(fields, ["a", "b", ""]);
//! ```

use bstr::ByteSlice;

use crate::SplitError;

/// What a split function decided about the bytes it was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    /// No token. Advance this many bytes; zero means "need more data".
    Skip(usize),
    /// A complete token.
    Token {
        /// Bytes consumed, including any delimiter.
        advance: usize,
        /// The token itself.
        token: &'a [u8],
    },
    /// The final-token sentinel: emit `token` if present, then stop.
    ///
    /// This is not a failure. `Some(b"")` emits an empty token, `None`
    /// ends the sequence without emitting anything.
    Final {
        /// Bytes consumed.
        advance: usize,
        /// Last token to emit, if any.
        token: Option<&'a [u8]>,
    },
}

impl<'a> Split<'a> {
    /// Nothing to emit yet; read more input.
    pub const NEED_MORE: Self = Split::Skip(0);

    /// A token that consumed `advance` bytes.
    #[inline]
    #[must_use]
    pub fn token(advance: usize, token: &'a [u8]) -> Self {
        Split::Token { advance, token }
    }

    /// The last token of the sequence.
    #[inline]
    #[must_use]
    pub fn final_token(advance: usize, token: &'a [u8]) -> Self {
        Split::Final {
            advance,
            token: Some(token),
        }
    }

    /// End the sequence here without emitting a token.
    #[inline]
    #[must_use]
    pub fn stop(advance: usize) -> Self {
        Split::Final {
            advance,
            token: None,
        }
    }

    /// Number of bytes this result consumes.
    #[inline]
    #[must_use]
    pub fn advance(&self) -> usize {
        match *self {
            Split::Skip(advance)
            | Split::Token { advance, .. }
            | Split::Final { advance, .. } => advance,
        }
    }

    /// The token carried by this result, if any.
    #[inline]
    #[must_use]
    pub fn token_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Split::Skip(_) => None,
            Split::Token { token, .. } => Some(token),
            Split::Final { token, .. } => token,
        }
    }

    /// Whether this is the final-token sentinel.
    #[inline]
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Split::Final { .. })
    }
}

/// Result of one split function call.
pub type SplitResult<'a> = Result<Split<'a>, SplitError>;

/// A boxed split function as stored by the scanner.
pub type SplitFn = Box<dyn for<'a> FnMut(&'a [u8], bool) -> SplitResult<'a> + Send>;

const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// Splits on `\n`, dropping the newline and one preceding `\r`.
///
/// An unterminated last line is delivered as the final token. An empty
/// remainder at end of input yields nothing.
///
/// # Errors
///
/// Never fails.
pub fn scan_lines(data: &[u8], at_eof: bool) -> SplitResult<'_> {
    if let Some(i) = data.find_byte(b'\n') {
        return Ok(Split::token(i + 1, drop_cr(&data[..i])));
    }
    if at_eof && !data.is_empty() {
        return Ok(Split::final_token(data.len(), drop_cr(data)));
    }
    Ok(Split::NEED_MORE)
}

fn drop_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits on runs of Unicode whitespace. Words never contain whitespace and
/// are never empty. Bytes that are not valid UTF-8 count as word characters.
///
/// # Errors
///
/// Never fails.
pub fn scan_words(data: &[u8], at_eof: bool) -> SplitResult<'_> {
    let mut start = 0;
    while start < data.len() {
        let (ch, width) = bstr::decode_utf8(&data[start..]);
        if !ch.is_some_and(char::is_whitespace) {
            break;
        }
        start += width;
    }

    let mut i = start;
    while i < data.len() {
        let (ch, width) = bstr::decode_utf8(&data[i..]);
        if ch.is_some_and(char::is_whitespace) {
            return Ok(Split::token(i + width, &data[start..i]));
        }
        i += width;
    }

    if at_eof && data.len() > start {
        return Ok(Split::token(data.len(), &data[start..]));
    }
    Ok(Split::Skip(start))
}

/// Splits into UTF-8 encoded scalar values.
///
/// Invalid encodings produce U+FFFD and advance a single byte, so the
/// sequence of tokens always matches what a lossy UTF-8 decode would see.
///
/// # Errors
///
/// Never fails.
pub fn scan_runes(data: &[u8], at_eof: bool) -> SplitResult<'_> {
    let Some(&first) = data.first() else {
        return Ok(Split::NEED_MORE);
    };
    if first.is_ascii() {
        return Ok(Split::token(1, &data[..1]));
    }
    match bstr::decode_utf8(data) {
        (Some(_), width) => Ok(Split::token(width, &data[..width])),
        // A valid prefix of a longer sequence; wait for the rest.
        (None, valid) if !at_eof && valid == data.len() && data.len() < utf8_width(first) => {
            Ok(Split::NEED_MORE)
        }
        (None, _) => Ok(Split::token(1, REPLACEMENT)),
    }
}

fn utf8_width(first: u8) -> usize {
    match first {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

/// Splits into single bytes.
///
/// # Errors
///
/// Never fails.
pub fn scan_bytes(data: &[u8], _at_eof: bool) -> SplitResult<'_> {
    match data {
        [] => Ok(Split::NEED_MORE),
        [_, ..] => Ok(Split::token(1, &data[..1])),
    }
}
