use std::io::{self, ErrorKind, Read};

use crate::{ScanError, Scanner};

/// Serves `data` at most `chunk` bytes per read and counts the reads.
#[derive(Debug)]
pub(crate) struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    pub(crate) reads: usize,
}

impl ChunkedReader {
    pub(crate) fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        assert!(chunk > 0);
        Self {
            data: data.into(),
            pos: 0,
            chunk,
            reads: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Serves `data`, then fails every read with `kind`.
pub(crate) struct FailingReader {
    data: &'static [u8],
    kind: ErrorKind,
}

impl FailingReader {
    pub(crate) fn new(data: &'static [u8], kind: ErrorKind) -> Self {
        Self { data, kind }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(self.kind, "source failed"));
        }
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Alternates between `WouldBlock` and a single byte of `data`.
pub(crate) struct FlakyReader {
    data: &'static [u8],
    blocked: bool,
}

impl FlakyReader {
    pub(crate) fn new(data: &'static [u8]) -> Self {
        Self {
            data,
            blocked: false,
        }
    }
}

impl Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.blocked = !self.blocked;
        if self.blocked {
            return Err(ErrorKind::WouldBlock.into());
        }
        let Some((&first, rest)) = self.data.split_first() else {
            return Ok(0);
        };
        buf[0] = first;
        self.data = rest;
        Ok(1)
    }
}

/// Drains a scanner into lossy strings plus the terminal error, if any.
pub(crate) fn drain<R: Read>(mut scanner: Scanner<R>) -> (Vec<String>, Option<ScanError>) {
    let mut tokens = Vec::new();
    while let Some(item) = scanner.next() {
        match item {
            Ok(token) => tokens.push(token.to_string()),
            Err(e) => {
                assert!(scanner.next().is_none(), "scanner yielded past its error");
                return (tokens, Some(e));
            }
        }
    }
    (tokens, None)
}
