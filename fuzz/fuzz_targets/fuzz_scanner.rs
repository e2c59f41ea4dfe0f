#![no_main]
use std::io::{self, Read};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scanseq::{
    ScanError, ScanOption, Scanner, ScannerOptions,
    split::{scan_bytes, scan_lines, scan_runes, scan_words},
};

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Strategy {
    Lines,
    Words,
    Runes,
    Bytes,
}

#[derive(Debug, Arbitrary)]
struct Input {
    strategy: Strategy,
    /// Read sizes handed out by the source, cycled.
    chunks: Vec<u8>,
    initial_capacity: u8,
    max_token_size: u16,
    data: Vec<u8>,
}

struct Chunked<'a> {
    data: &'a [u8],
    chunks: &'a [u8],
    turn: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = match self.chunks {
            [] => buf.len(),
            chunks => usize::from(chunks[self.turn % chunks.len()]),
        };
        self.turn += 1;
        if want == 0 && !self.data.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let n = want.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fuzz_target!(|input: Input| {
    let options = ScannerOptions {
        initial_capacity: usize::from(input.initial_capacity),
        max_token_size: usize::from(input.max_token_size),
    };
    let split = match input.strategy {
        Strategy::Lines => ScanOption::split(scan_lines),
        Strategy::Words => ScanOption::split(scan_words),
        Strategy::Runes => ScanOption::split(scan_runes),
        Strategy::Bytes => ScanOption::split(scan_bytes),
    };
    let source = Chunked {
        data: &input.data,
        chunks: &input.chunks,
        turn: 0,
    };

    let mut total = 0usize;
    let mut failed = false;
    for item in Scanner::with_options(source, [ScanOption::config(options), split]) {
        assert!(!failed, "item after terminal error");
        match item {
            Ok(token) => {
                if !matches!(input.strategy, Strategy::Runes) {
                    assert!(token.len() <= usize::from(input.max_token_size));
                }
                total += token.len();
            }
            Err(ScanError::TooLong { .. } | ScanError::NoProgress { .. }) => failed = true,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    // Tokens never carry more bytes than the source produced, except runes
    // that replace invalid bytes with U+FFFD.
    if !matches!(input.strategy, Strategy::Runes) {
        assert!(total <= input.data.len());
    }
});
