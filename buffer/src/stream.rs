//! Fixed-capacity block ring buffer.

use std::fmt;
use std::sync::Arc;

use pcmpipe_audio::AudioFormat;
use tracing::{debug, trace};

use crate::abstract_stream::{AbstractStream, Event, EventListener, StreamTraits};
use crate::allocator::Allocator;
use crate::raw_block_iterator::RawBlockIterator;

/// Number of blocks a stream holds unless told otherwise.
pub const DEFAULT_BLOCK_COUNT: usize = 32;

/// A lossless FIFO of equal-size PCM blocks.
///
/// `Stream` owns one contiguous arena of `block_count * block_size` bytes
/// for its whole lifetime; nothing is allocated after construction.
///
/// # Semantics
///
/// - **Copying**: `push` copies a block in, `pop` copies the oldest out
/// - **Zero-copy write**: `reserve` lends the next free block, `commit`
///   publishes it, `release` abandons it. While any reservation is
///   outstanding, copying pushes fail
/// - **Zero-copy read**: `peek` lends the oldest not-yet-peeked block and
///   may be repeated to walk forward, `unpeek` steps back, `consume`
///   removes everything peeked. While blocks are peeked, `pop` fails
///
/// There is no internal locking: one writer and one reader take turns
/// through `&mut self`. Wrap the stream in a
/// [`SharedStream`](crate::SharedStream) to drive it from two threads.
///
/// # Example
///
/// ```
/// use pcmpipe_audio::AudioFormat;
/// use pcmpipe_buffer::{AbstractStream, StandardAllocator, Stream};
///
/// let mut stream = Stream::new(AudioFormat::MONO_16K_16, &StandardAllocator, 4, 2);
///
/// let block = stream.reserve().unwrap();
/// block.copy_from_slice(&[1, 2, 3, 4]);
/// stream.commit();
///
/// assert_eq!(stream.peek().unwrap(), &[1, 2, 3, 4]);
/// stream.consume();
/// assert!(stream.is_empty());
/// ```
pub struct Stream {
    format: AudioFormat,
    block_size: usize,
    block_count: usize,
    arena: Box<[u8]>,
    // oldest used block
    data_start: RawBlockIterator,
    // first free block; reservations start here
    data_end: RawBlockIterator,
    // next block to peek, `peeked_count` blocks past `data_start`
    peek_position: RawBlockIterator,
    // next block to reserve, `reserved_count` blocks past `data_end`
    reserve_position: RawBlockIterator,
    used_blocks: usize,
    peeked_count: usize,
    reserved_count: usize,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl Stream {
    /// Creates a stream of `block_count` blocks of `block_size` bytes, with
    /// the arena taken from `allocator`.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` or `block_count` is zero, if the arena size
    /// overflows `usize`, or if the allocator returns an arena of the wrong
    /// size.
    pub fn new(
        format: AudioFormat,
        allocator: &dyn Allocator,
        block_size: usize,
        block_count: usize,
    ) -> Self {
        assert!(block_size > 0, "block size must be greater than 0");
        assert!(block_count > 0, "block count must be greater than 0");

        let Some(arena_size) = block_size.checked_mul(block_count) else {
            panic!("arena size overflows: {} blocks of {} bytes", block_count, block_size);
        };
        let arena = allocator.allocate(arena_size);
        assert_eq!(arena.len(), arena_size, "allocator returned a short arena");

        debug!(
            "stream created: {} blocks of {} bytes, format {}",
            block_count, block_size, format
        );

        let cursor = RawBlockIterator::new(arena_size, block_size);
        Stream {
            format,
            block_size,
            block_count,
            arena,
            data_start: cursor,
            data_end: cursor,
            peek_position: cursor,
            reserve_position: cursor,
            used_blocks: 0,
            peeked_count: 0,
            reserved_count: 0,
            listeners: Vec::new(),
        }
    }

    /// Creates a stream with [`DEFAULT_BLOCK_COUNT`] blocks.
    pub fn with_default_buffering(
        format: AudioFormat,
        allocator: &dyn Allocator,
        block_size: usize,
    ) -> Self {
        Self::new(format, allocator, block_size, DEFAULT_BLOCK_COUNT)
    }

    /// Size of one block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Format of the stored audio.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    fn free_blocks(&self) -> usize {
        self.block_count - self.used_blocks - self.reserved_count
    }

    fn broadcast(&self, event: Event) {
        for listener in &self.listeners {
            listener.on_event(self, event);
        }
    }

    // State events after a block was published.
    fn broadcast_published(&self) {
        if self.used_blocks == self.block_count {
            self.broadcast(Event::StreamFull);
        } else if self.block_count >= 2 && self.used_blocks == self.block_count / 2 {
            self.broadcast(Event::StreamHalfUsed);
        }
    }

    fn can_push(&self) -> bool {
        if self.reserved_count > 0 {
            return false;
        }
        if self.used_blocks == self.block_count {
            trace!("stream overflow: {} blocks in use", self.used_blocks);
            self.broadcast(Event::StreamOverFlow);
            return false;
        }
        true
    }

    fn publish_next(&mut self) {
        self.data_end.advance();
        self.used_blocks += 1;
    }
}

impl AbstractStream for Stream {
    fn push(&mut self, data: &[u8]) -> bool {
        if data.len() != self.block_size || !self.can_push() {
            return false;
        }
        let range = self.data_end.range();
        self.arena[range].copy_from_slice(data);
        self.publish_next();
        self.reserve_position = self.data_end;
        self.broadcast_published();
        true
    }

    fn push_block(&mut self) -> bool {
        if !self.can_push() {
            return false;
        }
        self.publish_next();
        self.reserve_position = self.data_end;
        self.broadcast_published();
        true
    }

    fn pop(&mut self, out: &mut [u8]) -> bool {
        if self.peeked_count > 0 || out.len() != self.block_size || self.used_blocks == 0 {
            return false;
        }
        out.copy_from_slice(&self.arena[self.data_start.range()]);
        self.data_start.advance();
        self.peek_position = self.data_start;
        self.used_blocks -= 1;
        if self.used_blocks == 0 {
            self.broadcast(Event::StreamEmpty);
        }
        true
    }

    fn reserve(&mut self) -> Option<&mut [u8]> {
        if self.free_blocks() == 0 {
            return None;
        }
        let range = self.reserve_position.range();
        self.reserve_position.advance();
        self.reserved_count += 1;
        Some(&mut self.arena[range])
    }

    fn commit(&mut self) {
        if self.reserved_count == 0 {
            return;
        }
        self.reserved_count -= 1;
        self.publish_next();
        self.broadcast_published();
    }

    fn release(&mut self) {
        if self.reserved_count == 0 {
            return;
        }
        self.reserve_position.retreat();
        self.reserved_count -= 1;
    }

    fn peek(&mut self) -> Option<&[u8]> {
        if self.peeked_count == self.used_blocks {
            if self.used_blocks == 0 {
                trace!("stream underflow");
                self.broadcast(Event::StreamUnderFlow);
            }
            return None;
        }
        let range = self.peek_position.range();
        self.peek_position.advance();
        self.peeked_count += 1;
        Some(&self.arena[range])
    }

    fn unpeek(&mut self) {
        if self.peeked_count == 0 {
            return;
        }
        self.peek_position.retreat();
        self.peeked_count -= 1;
    }

    fn consume(&mut self) {
        if self.peeked_count == 0 {
            return;
        }
        self.data_start.advance_by(self.peeked_count);
        self.used_blocks -= self.peeked_count;
        self.peeked_count = 0;
        self.peek_position = self.data_start;
        if self.used_blocks == 0 {
            self.broadcast(Event::StreamEmpty);
        }
    }

    fn reset(&mut self) {
        self.data_start.rewind();
        self.data_end.rewind();
        self.peek_position.rewind();
        self.reserve_position.rewind();
        self.used_blocks = 0;
        self.peeked_count = 0;
        self.reserved_count = 0;
    }

    fn register_listener(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners.push(listener);
    }

    fn unregister_listeners(&mut self, listener: &Arc<dyn EventListener>) {
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    fn is_empty(&self) -> bool {
        self.used_blocks == 0
    }

    fn is_full(&self) -> bool {
        self.used_blocks == self.block_count
    }

    fn blocks_available(&self) -> bool {
        self.free_blocks() > 0
    }

    fn used_block_count(&self) -> usize {
        self.used_blocks
    }

    fn block_count(&self) -> usize {
        self.block_count
    }

    fn peeked_count(&self) -> usize {
        self.peeked_count
    }

    fn reserved_count(&self) -> usize {
        self.reserved_count
    }

    fn input_traits(&self) -> StreamTraits {
        StreamTraits {
            block_size: self.block_size,
            format: self.format,
        }
    }

    fn output_traits(&self) -> StreamTraits {
        self.input_traits()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("format", &self.format)
            .field("block_size", &self.block_size)
            .field("block_count", &self.block_count)
            .field("used_blocks", &self.used_blocks)
            .field("peeked_count", &self.peeked_count)
            .field("reserved_count", &self.reserved_count)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_stream::ListenerFunc;
    use crate::allocator::StandardAllocator;
    use std::sync::Mutex;

    const BLOCK_SIZE: usize = 8;
    const BLOCK_COUNT: usize = 4;

    fn test_format() -> AudioFormat {
        AudioFormat::new(44100, 16, 2)
    }

    fn new_stream() -> Stream {
        Stream::new(test_format(), &StandardAllocator, BLOCK_SIZE, BLOCK_COUNT)
    }

    fn block(seed: u8) -> [u8; BLOCK_SIZE] {
        std::array::from_fn(|i| seed.wrapping_mul(16).wrapping_add(i as u8))
    }

    fn recorder() -> (Arc<dyn EventListener>, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let listener: Arc<dyn EventListener> =
            Arc::new(ListenerFunc(move |_: &dyn AbstractStream, event: Event| {
                sink.lock().unwrap().push(event);
            }));
        (listener, events)
    }

    #[test]
    fn test_init() {
        let stream = Stream::new(test_format(), &StandardAllocator, 64, 2);
        assert_eq!(stream.block_count(), 2);
        assert_eq!(stream.used_block_count(), 0);
        assert!(stream.is_empty());
        assert!(!stream.is_full());
        assert!(stream.blocks_available());
        assert_eq!(stream.peeked_count(), 0);
        assert_eq!(stream.reserved_count(), 0);
    }

    #[test]
    fn test_default_buffering() {
        let stream = Stream::with_default_buffering(test_format(), &StandardAllocator, 64);
        assert_eq!(stream.block_count(), DEFAULT_BLOCK_COUNT);
    }

    #[test]
    fn test_traits() {
        let stream = new_stream();
        let expected = StreamTraits {
            block_size: BLOCK_SIZE,
            format: test_format(),
        };
        assert_eq!(stream.input_traits(), expected);
        assert_eq!(stream.output_traits(), expected);
    }

    #[test]
    fn test_push_until_full() {
        let mut stream = new_stream();
        for i in 0..BLOCK_COUNT {
            assert!(stream.push(&block(i as u8)));
        }
        assert!(stream.is_full());
        assert!(!stream.blocks_available());
        assert!(!stream.push(&block(9)));
        assert_eq!(stream.used_block_count(), BLOCK_COUNT);
    }

    #[test]
    fn test_push_size_mismatch() {
        let mut stream = new_stream();
        assert!(!stream.push(&[0u8; BLOCK_SIZE - 1]));
        assert!(!stream.push(&[0u8; BLOCK_SIZE + 1]));
        assert!(!stream.push(&[]));
        assert_eq!(stream.used_block_count(), 0);
    }

    #[test]
    fn test_push_pop_round_trip() {
        let mut stream = new_stream();
        for i in 0..BLOCK_COUNT {
            assert!(stream.push(&block(i as u8)));
        }
        for i in 0..BLOCK_COUNT {
            let mut out = [0u8; BLOCK_SIZE];
            assert!(stream.pop(&mut out));
            assert_eq!(out, block(i as u8));
        }
        assert!(stream.is_empty());
    }

    #[test]
    fn test_pop_failures() {
        let mut stream = new_stream();
        let mut out = [0u8; BLOCK_SIZE];
        assert!(!stream.pop(&mut out));

        assert!(stream.push(&block(1)));
        let mut short = [0u8; BLOCK_SIZE - 2];
        assert!(!stream.pop(&mut short));
        assert_eq!(stream.used_block_count(), 1);
    }

    #[test]
    fn test_wrap_around() {
        let mut stream = new_stream();
        let mut out = [0u8; BLOCK_SIZE];
        for round in 0..3u8 {
            for i in 0..3 {
                assert!(stream.push(&block(round * 10 + i)));
            }
            for i in 0..3 {
                assert!(stream.pop(&mut out));
                assert_eq!(out, block(round * 10 + i));
            }
        }
        assert!(stream.is_empty());
    }

    #[test]
    fn test_push_block_commits_current_contents() {
        let mut stream = new_stream();
        assert!(stream.push(&block(1)));
        let mut out = [0u8; BLOCK_SIZE];
        assert!(stream.pop(&mut out));

        // the second block has never been written
        assert!(stream.push_block());
        assert_eq!(stream.used_block_count(), 1);
        assert!(stream.pop(&mut out));
        assert_eq!(out, [0u8; BLOCK_SIZE]);

        for _ in 0..BLOCK_COUNT {
            assert!(stream.push_block());
        }
        assert!(!stream.push_block());
    }

    #[test]
    fn test_greedy_peek() {
        let mut stream = new_stream();
        for i in 0..BLOCK_COUNT {
            assert!(stream.push(&block(i as u8)));
        }
        for i in 0..BLOCK_COUNT {
            let data = stream.peek().unwrap().to_vec();
            assert_eq!(data, block(i as u8));
            assert_eq!(stream.peeked_count(), i + 1);
        }
        assert!(stream.peek().is_none());
        assert_eq!(stream.peeked_count(), BLOCK_COUNT);
    }

    #[test]
    fn test_peek_span_is_block_memory() {
        let mut stream = new_stream();
        let reserved = stream.reserve().unwrap().as_ptr();
        stream.commit();
        let peeked = stream.peek().unwrap().as_ptr();
        assert_eq!(reserved, peeked);
    }

    #[test]
    fn test_unpeek() {
        let mut stream = new_stream();
        assert!(stream.push(&block(1)));
        assert!(stream.push(&block(2)));

        let first = stream.peek().unwrap().as_ptr();
        stream.unpeek();
        assert_eq!(stream.peeked_count(), 0);
        assert_eq!(stream.peek().unwrap().as_ptr(), first);

        // unpeek with nothing peeked is a no-op
        stream.unpeek();
        stream.unpeek();
        assert_eq!(stream.peeked_count(), 0);
    }

    #[test]
    fn test_consume() {
        let mut stream = new_stream();
        assert!(stream.push(&block(1)));
        assert!(stream.peek().is_some());
        stream.consume();
        assert_eq!(stream.used_block_count(), 0);
        assert_eq!(stream.peeked_count(), 0);
        assert!(stream.is_empty());

        for i in 0..3 {
            assert!(stream.push(&block(i)));
        }
        assert!(stream.peek().is_some());
        assert!(stream.peek().is_some());
        stream.consume();
        assert_eq!(stream.used_block_count(), 1);
        assert_eq!(stream.peek().unwrap(), &block(2));
    }

    #[test]
    fn test_pop_blocked_by_peek() {
        let mut stream = new_stream();
        assert!(stream.push(&block(1)));
        assert!(stream.push(&block(2)));
        assert!(stream.peek().is_some());

        let mut out = [0u8; BLOCK_SIZE];
        assert!(!stream.pop(&mut out));
        stream.unpeek();
        assert!(stream.pop(&mut out));
        assert_eq!(out, block(1));
    }

    #[test]
    fn test_push_while_peeked() {
        let mut stream = new_stream();
        assert!(stream.push(&block(1)));
        assert!(stream.peek().is_some());
        assert!(stream.push(&block(2)));
        assert_eq!(stream.peek().unwrap(), &block(2));
    }

    #[test]
    fn test_reserve_commit() {
        let mut stream = new_stream();
        let span = stream.reserve().unwrap();
        assert_eq!(span.len(), BLOCK_SIZE);
        span.copy_from_slice(&block(5));
        assert_eq!(stream.reserved_count(), 1);
        assert_eq!(stream.used_block_count(), 0);

        stream.commit();
        assert_eq!(stream.reserved_count(), 0);
        assert_eq!(stream.used_block_count(), 1);

        let mut out = [0u8; BLOCK_SIZE];
        assert!(stream.pop(&mut out));
        assert_eq!(out, block(5));
    }

    #[test]
    fn test_reservation_blocks_push() {
        let mut stream = new_stream();
        assert!(stream.reserve().is_some());
        assert!(!stream.push(&block(1)));
        assert!(!stream.push_block());

        stream.release();
        assert_eq!(stream.used_block_count(), 0);
        assert_eq!(stream.reserved_count(), 0);
        assert!(stream.push(&block(1)));
    }

    #[test]
    fn test_release_reuses_block() {
        let mut stream = new_stream();
        let first = stream.reserve().unwrap().as_ptr();
        stream.release();
        let second = stream.reserve().unwrap().as_ptr();
        assert_eq!(first, second);

        // commit/release without a reservation are no-ops
        stream.commit();
        stream.commit();
        stream.release();
        assert_eq!(stream.used_block_count(), 1);
        assert_eq!(stream.reserved_count(), 0);
    }

    #[test]
    fn test_multiple_reservations() {
        let mut stream = new_stream();
        for i in 0..BLOCK_COUNT {
            stream.reserve().unwrap().copy_from_slice(&block(i as u8));
        }
        assert!(stream.reserve().is_none());
        assert!(!stream.blocks_available());
        assert_eq!(stream.reserved_count(), BLOCK_COUNT);

        // the newest reservation is dropped, the rest publish in order
        stream.release();
        for _ in 0..BLOCK_COUNT - 1 {
            stream.commit();
        }
        assert_eq!(stream.used_block_count(), BLOCK_COUNT - 1);
        let mut out = [0u8; BLOCK_SIZE];
        for i in 0..BLOCK_COUNT - 1 {
            assert!(stream.pop(&mut out));
            assert_eq!(out, block(i as u8));
        }
    }

    #[test]
    fn test_reserve_when_full() {
        let mut stream = new_stream();
        for i in 0..BLOCK_COUNT {
            assert!(stream.push(&block(i as u8)));
        }
        assert!(stream.reserve().is_none());
        assert_eq!(stream.reserved_count(), 0);
    }

    #[test]
    fn test_reset() {
        let mut stream = new_stream();
        assert!(stream.push(&block(1)));
        assert!(stream.push(&block(2)));
        assert!(stream.peek().is_some());
        assert!(stream.reserve().is_some());

        stream.reset();
        assert!(stream.is_empty());
        assert_eq!(stream.peeked_count(), 0);
        assert_eq!(stream.reserved_count(), 0);
        assert!(stream.peek().is_none());
        assert!(stream.push(&block(3)));
        assert_eq!(stream.peek().unwrap(), &block(3));
    }

    #[test]
    fn test_underflow_event() {
        let mut stream = new_stream();
        let (listener, events) = recorder();
        stream.register_listener(Arc::clone(&listener));

        assert!(stream.peek().is_none());
        assert_eq!(*events.lock().unwrap(), vec![Event::StreamUnderFlow]);

        // all blocks peeked is not an underflow
        assert!(stream.push(&block(1)));
        events.lock().unwrap().clear();
        assert!(stream.peek().is_some());
        assert!(stream.peek().is_none());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_state_events() {
        let mut stream = new_stream();
        let (listener, events) = recorder();
        stream.register_listener(Arc::clone(&listener));

        for i in 0..BLOCK_COUNT {
            assert!(stream.push(&block(i as u8)));
        }
        assert!(!stream.push(&block(9)));
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::StreamHalfUsed, Event::StreamFull, Event::StreamOverFlow]
        );

        events.lock().unwrap().clear();
        for _ in 0..BLOCK_COUNT {
            assert!(stream.peek().is_some());
        }
        stream.consume();
        assert_eq!(*events.lock().unwrap(), vec![Event::StreamEmpty]);
    }

    #[test]
    fn test_unregister_listeners() {
        let mut stream = new_stream();
        let (listener, events) = recorder();
        let (other, other_events) = recorder();
        stream.register_listener(Arc::clone(&listener));
        stream.register_listener(Arc::clone(&listener));
        stream.register_listener(Arc::clone(&other));

        stream.unregister_listeners(&listener);
        assert!(stream.peek().is_none());
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(*other_events.lock().unwrap(), vec![Event::StreamUnderFlow]);

        // unregistering an unknown listener is a no-op
        let (unknown, _) = recorder();
        stream.unregister_listeners(&unknown);
        assert!(stream.peek().is_none());
        assert_eq!(other_events.lock().unwrap().len(), 2);
    }

    #[test]
    #[should_panic(expected = "arena size overflows")]
    fn test_arena_size_overflow() {
        Stream::new(test_format(), &StandardAllocator, 8, usize::MAX);
    }

    #[test]
    #[should_panic(expected = "block count must be greater than 0")]
    fn test_zero_block_count() {
        Stream::new(test_format(), &StandardAllocator, 8, 0);
    }
}
