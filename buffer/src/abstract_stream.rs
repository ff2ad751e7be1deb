//! The operation surface shared by every stream-like object.

use std::fmt;
use std::sync::Arc;

use pcmpipe_audio::AudioFormat;

/// Negotiated shape of one side (input or output) of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamTraits {
    /// Size of one block in bytes.
    pub block_size: usize,
    /// Format of the data in a block.
    pub format: AudioFormat,
}

/// Notification broadcast to registered listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// The last free block was published.
    StreamFull,
    /// Exactly half of the blocks are in use after a publish.
    StreamHalfUsed,
    /// The last used block was removed.
    StreamEmpty,
    /// A copying push hit a full stream.
    StreamOverFlow,
    /// A peek found no data.
    StreamUnderFlow,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::StreamFull => "stream full",
            Event::StreamHalfUsed => "stream half used",
            Event::StreamEmpty => "stream empty",
            Event::StreamOverFlow => "stream overflow",
            Event::StreamUnderFlow => "stream underflow",
        };
        f.write_str(name)
    }
}

/// Receives stream events synchronously on the thread that caused them.
pub trait EventListener: Send + Sync {
    /// Called with the stream that raised `event`.
    fn on_event(&self, stream: &dyn AbstractStream, event: Event);
}

/// An [`EventListener`] backed by a closure.
pub struct ListenerFunc<F>(pub F);

impl<F> EventListener for ListenerFunc<F>
where
    F: Fn(&dyn AbstractStream, Event) + Send + Sync,
{
    fn on_event(&self, stream: &dyn AbstractStream, event: Event) {
        (self.0)(stream, event)
    }
}

/// A block-structured FIFO with copying and zero-copy access.
///
/// Writers use [`push`](Self::push) or the
/// [`reserve`](Self::reserve)/[`commit`](Self::commit)/[`release`](Self::release)
/// triple; readers use [`pop`](Self::pop) or the
/// [`peek`](Self::peek)/[`unpeek`](Self::unpeek)/[`consume`](Self::consume)
/// triple. Failed operations return `false`/`None` and change nothing.
pub trait AbstractStream {
    /// Copies one block in. Fails on a size mismatch, when full, or while a
    /// reservation is outstanding.
    fn push(&mut self, data: &[u8]) -> bool;

    /// Publishes the next free block with whatever it currently holds.
    fn push_block(&mut self) -> bool;

    /// Copies the oldest block out and frees it. Fails when empty, on a size
    /// mismatch, or while blocks are peeked.
    fn pop(&mut self, out: &mut [u8]) -> bool;

    /// Binds the next free block for writing without publishing it.
    fn reserve(&mut self) -> Option<&mut [u8]>;

    /// Publishes the oldest outstanding reservation.
    fn commit(&mut self);

    /// Cancels the most recent reservation.
    fn release(&mut self);

    /// Binds the oldest not-yet-peeked block for reading without removing it.
    fn peek(&mut self) -> Option<&[u8]>;

    /// Reverts the most recent peek.
    fn unpeek(&mut self);

    /// Removes every peeked block.
    fn consume(&mut self);

    /// Drops all data, reservations and peeks.
    fn reset(&mut self);

    fn register_listener(&mut self, listener: Arc<dyn EventListener>);

    /// Removes every registration of `listener`.
    fn unregister_listeners(&mut self, listener: &Arc<dyn EventListener>);

    fn is_empty(&self) -> bool;

    fn is_full(&self) -> bool;

    /// Returns true if a block can be reserved or pushed.
    fn blocks_available(&self) -> bool;

    fn used_block_count(&self) -> usize;

    fn block_count(&self) -> usize;

    fn peeked_count(&self) -> usize;

    fn reserved_count(&self) -> usize;

    /// Shape of the blocks a writer must supply.
    fn input_traits(&self) -> StreamTraits;

    /// Shape of the blocks a reader receives.
    fn output_traits(&self) -> StreamTraits;
}

// Forwards every operation through a double dereference of `self`.
macro_rules! deref_stream_impl {
    () => {
        fn push(&mut self, data: &[u8]) -> bool {
            (**self).push(data)
        }

        fn push_block(&mut self) -> bool {
            (**self).push_block()
        }

        fn pop(&mut self, out: &mut [u8]) -> bool {
            (**self).pop(out)
        }

        fn reserve(&mut self) -> Option<&mut [u8]> {
            (**self).reserve()
        }

        fn commit(&mut self) {
            (**self).commit()
        }

        fn release(&mut self) {
            (**self).release()
        }

        fn peek(&mut self) -> Option<&[u8]> {
            (**self).peek()
        }

        fn unpeek(&mut self) {
            (**self).unpeek()
        }

        fn consume(&mut self) {
            (**self).consume()
        }

        fn reset(&mut self) {
            (**self).reset()
        }

        fn register_listener(&mut self, listener: Arc<dyn EventListener>) {
            (**self).register_listener(listener)
        }

        fn unregister_listeners(&mut self, listener: &Arc<dyn EventListener>) {
            (**self).unregister_listeners(listener)
        }

        fn is_empty(&self) -> bool {
            (**self).is_empty()
        }

        fn is_full(&self) -> bool {
            (**self).is_full()
        }

        fn blocks_available(&self) -> bool {
            (**self).blocks_available()
        }

        fn used_block_count(&self) -> usize {
            (**self).used_block_count()
        }

        fn block_count(&self) -> usize {
            (**self).block_count()
        }

        fn peeked_count(&self) -> usize {
            (**self).peeked_count()
        }

        fn reserved_count(&self) -> usize {
            (**self).reserved_count()
        }

        fn input_traits(&self) -> StreamTraits {
            (**self).input_traits()
        }

        fn output_traits(&self) -> StreamTraits {
            (**self).output_traits()
        }
    };
}

impl<S: AbstractStream + ?Sized> AbstractStream for &mut S {
    deref_stream_impl!();
}

impl<S: AbstractStream + ?Sized> AbstractStream for Box<S> {
    deref_stream_impl!();
}
