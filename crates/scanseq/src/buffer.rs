//! The scan buffer: an owned, growable byte arena with a hard size limit.
//!
//! Layout
//! - `data.len()` is the buffer's capacity. The vector is always fully
//!   initialized so the reader can hand `data[end..]` straight to
//!   `Read::read`.
//! - `data[start..end]` holds bytes read from the source but not yet
//!   consumed by the split function.
//! - `data[..start]` has been yielded or skipped and may be reclaimed.
//!
//! Invariants
//! - `data.len() >= end >= start`.
//! - The buffer never grows past `max(limit, seeded capacity)`.

use tracing::debug;

use crate::ScanError;

#[derive(Debug)]
pub(crate) struct ScanBuffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
    initial: usize,
    limit: usize,
}

impl ScanBuffer {
    /// Creates an unallocated buffer. The first growth allocates `initial`
    /// bytes (clamped to `limit`).
    pub(crate) fn new(initial: usize, limit: usize) -> Self {
        Self {
            data: Vec::new(),
            start: 0,
            end: 0,
            initial,
            limit,
        }
    }

    /// Creates a buffer that starts out using the whole capacity of `seed`.
    pub(crate) fn seeded(mut seed: Vec<u8>, initial: usize, limit: usize) -> Self {
        let capacity = seed.capacity();
        seed.clear();
        seed.resize(capacity, 0);
        Self {
            data: seed,
            start: 0,
            end: 0,
            initial,
            limit,
        }
    }

    #[inline]
    pub(crate) fn unconsumed(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Marks `n` unconsumed bytes as consumed.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len(), "consume({n}) past {} bytes", self.len());
        self.start += n;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }

    /// Free space after the fill offset.
    #[inline]
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.end..]
    }

    /// Records `n` bytes written into [`spare_mut`](Self::spare_mut).
    #[inline]
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(self.end + n <= self.data.len());
        self.end += n;
    }

    /// Makes sure there is spare room for another read, first by reclaiming
    /// consumed bytes and then by doubling the buffer.
    ///
    /// Fails with [`ScanError::TooLong`] when the buffer is full of
    /// unconsumed bytes and may not grow any further.
    pub(crate) fn make_room(&mut self) -> Result<(), ScanError> {
        if self.start > 0 && (self.end == self.data.len() || self.start > self.data.len() / 2) {
            self.compact();
        }
        if self.end == self.data.len() {
            self.grow()?;
        }
        Ok(())
    }

    fn compact(&mut self) {
        debug!(
            consumed = self.start,
            pending = self.len(),
            "compacting scan buffer"
        );
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
    }

    fn grow(&mut self) -> Result<(), ScanError> {
        let capacity = self.data.len();
        if capacity >= self.limit {
            return Err(ScanError::TooLong {
                max: capacity.max(self.limit),
            });
        }
        let target = if capacity == 0 {
            self.initial.max(1)
        } else {
            capacity.saturating_mul(2)
        }
        .min(self.limit);
        debug!(from = capacity, to = target, "growing scan buffer");
        self.data.resize(target, 0);
        Ok(())
    }

    /// Drops the backing allocation. Used once scanning is over.
    pub(crate) fn release(&mut self) {
        self.data = Vec::new();
        self.start = 0;
        self.end = 0;
    }
}
