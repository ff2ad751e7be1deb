//! Circular block cursor over a flat byte arena.

use std::ops::Range;

/// A cursor that walks a flat arena in fixed-size block steps and wraps
/// around at both ends.
///
/// The cursor holds offsets only, never a reference into the arena, so a
/// stream can keep several of them next to the arena it indexes.
///
/// ```
/// use pcmpipe_buffer::RawBlockIterator;
///
/// let mut it = RawBlockIterator::new(12, 4);
/// it.retreat();
/// assert_eq!(it.range(), 8..12);
/// it.advance();
/// assert_eq!(it.range(), 0..4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlockIterator {
    offset: usize,
    block_size: usize,
    arena_size: usize,
}

impl RawBlockIterator {
    /// Creates a cursor at the first block of an arena of `arena_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero or does not divide `arena_size`.
    pub fn new(arena_size: usize, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be greater than 0");
        assert!(
            arena_size % block_size == 0,
            "arena size must be a whole number of blocks"
        );
        Self {
            offset: 0,
            block_size,
            arena_size,
        }
    }

    /// Byte offset of the current block.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Index of the current block.
    pub fn block_index(&self) -> usize {
        self.offset / self.block_size
    }

    /// Byte range of the current block.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.block_size
    }

    /// Moves to the next block, wrapping past the last one onto the first.
    pub fn advance(&mut self) {
        self.offset += self.block_size;
        if self.offset >= self.arena_size {
            self.offset = 0;
        }
    }

    /// Moves to the previous block, wrapping before the first onto the last.
    pub fn retreat(&mut self) {
        if self.arena_size == 0 {
            return;
        }
        if self.offset == 0 {
            self.offset = self.arena_size;
        }
        self.offset -= self.block_size;
    }

    /// Moves `n` blocks forward.
    pub fn advance_by(&mut self, n: usize) {
        if self.arena_size == 0 {
            return;
        }
        let step = (n % (self.arena_size / self.block_size)) * self.block_size;
        self.offset = (self.offset + step) % self.arena_size;
    }

    /// Moves back to the first block.
    pub fn rewind(&mut self) {
        self.offset = 0;
    }
}

/// Yields the current block range and advances; never ends.
impl Iterator for RawBlockIterator {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.arena_size == 0 {
            return None;
        }
        let range = self.range();
        self.advance();
        Some(range)
    }
}
