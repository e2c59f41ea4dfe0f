//! Buffered source reader: pulls bytes from an `io::Read` into the scan
//! buffer and remembers when the source is exhausted.

use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::{ScanError, buffer::ScanBuffer};

/// Reads that return no data before the reader gives up with
/// [`ScanError::NoProgress`].
pub(crate) const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;

/// Outcome of a single [`SourceReader::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Filled {
    pub(crate) read: usize,
    pub(crate) eof: bool,
}

#[derive(Debug)]
pub(crate) struct SourceReader<R> {
    inner: R,
    eof: bool,
}

impl<R> SourceReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, eof: false }
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    pub(crate) fn get_ref(&self) -> &R {
        &self.inner
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> SourceReader<R> {
    /// Appends freshly read bytes at the buffer's fill offset.
    ///
    /// `Ok(0)` from the source is end of input. `Interrupted` and
    /// `WouldBlock` mean "nothing yet" and are retried, up to
    /// [`MAX_CONSECUTIVE_EMPTY_READS`] times. Every other I/O error is passed
    /// through untouched.
    ///
    /// The caller must have made room in the buffer first.
    pub(crate) fn fill(&mut self, buffer: &mut ScanBuffer) -> Result<Filled, ScanError> {
        let spare = buffer.spare_mut();
        let capacity = spare.len();
        debug_assert!(capacity > 0, "fill called without spare room");

        for _ in 0..MAX_CONSECUTIVE_EMPTY_READS {
            match self.inner.read(spare) {
                Ok(0) => {
                    trace!("source exhausted");
                    self.eof = true;
                    return Ok(Filled { read: 0, eof: true });
                }
                Ok(read) if read > capacity => {
                    return Err(ScanError::BadReadCount { read, capacity });
                }
                Ok(read) => {
                    trace!(read, capacity, "read from source");
                    buffer.commit(read);
                    return Ok(Filled { read, eof: false });
                }
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                    trace!(kind = ?e.kind(), "source returned no data");
                }
                Err(e) => return Err(ScanError::Io(e)),
            }
        }

        Err(ScanError::NoProgress {
            reads: MAX_CONSECUTIVE_EMPTY_READS,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    struct Stalled {
        stalls: usize,
        kind: ErrorKind,
        data: &'static [u8],
    }

    impl Read for Stalled {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.stalls > 0 {
                self.stalls -= 1;
                return Err(self.kind.into());
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Liar;

    impl Read for Liar {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            Ok(buf.len() + 1)
        }
    }

    fn buffer() -> ScanBuffer {
        let mut buffer = ScanBuffer::new(8, 8);
        buffer.make_room().unwrap();
        buffer
    }

    #[test]
    fn reads_then_reports_eof() {
        let mut reader = SourceReader::new(Cursor::new(b"abc".to_vec()));
        let mut buf = buffer();

        let filled = reader.fill(&mut buf).unwrap();
        assert_eq!(filled, Filled { read: 3, eof: false });
        assert_eq!(buf.unconsumed(), b"abc");
        assert!(!reader.is_eof());

        let filled = reader.fill(&mut buf).unwrap();
        assert_eq!(filled, Filled { read: 0, eof: true });
        assert!(reader.is_eof());
    }

    #[test]
    fn transient_empty_reads_are_not_eof() {
        let source = Stalled {
            stalls: 5,
            kind: ErrorKind::WouldBlock,
            data: b"xy",
        };
        let mut reader = SourceReader::new(source);
        let mut buf = buffer();

        let filled = reader.fill(&mut buf).unwrap();
        assert_eq!(filled, Filled { read: 2, eof: false });
        assert_eq!(buf.unconsumed(), b"xy");
    }

    #[test]
    fn gives_up_after_too_many_empty_reads() {
        let source = Stalled {
            stalls: usize::MAX,
            kind: ErrorKind::Interrupted,
            data: b"",
        };
        let mut reader = SourceReader::new(source);
        let mut buf = buffer();

        let err = reader.fill(&mut buf).unwrap_err();
        assert!(matches!(err, ScanError::NoProgress { reads } if reads == MAX_CONSECUTIVE_EMPTY_READS));
        assert!(!reader.is_eof());
    }

    #[test]
    fn other_errors_pass_through() {
        let source = Stalled {
            stalls: 1,
            kind: ErrorKind::ConnectionReset,
            data: b"",
        };
        let mut reader = SourceReader::new(source);
        let mut buf = buffer();

        match reader.fill(&mut buf) {
            Err(ScanError::Io(e)) => assert_eq!(e.kind(), ErrorKind::ConnectionReset),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_impossible_read_counts() {
        let mut reader = SourceReader::new(Liar);
        let mut buf = buffer();

        let err = reader.fill(&mut buf).unwrap_err();
        assert!(matches!(err, ScanError::BadReadCount { read: 9, capacity: 8 }));
    }
}
