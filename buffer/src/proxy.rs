//! Pass-through stream wrapper.

use std::sync::Arc;

use crate::abstract_stream::{AbstractStream, EventListener, StreamTraits};

/// Forwards every operation to an inner stream unchanged.
///
/// `S` decides the ownership: `StreamProxy<Stream>` owns its stream,
/// `StreamProxy<&mut Stream>` borrows one, and
/// `StreamProxy<Box<dyn AbstractStream>>` wraps any stream behind a box.
#[derive(Debug)]
pub struct StreamProxy<S> {
    inner: S,
}

impl<S: AbstractStream> StreamProxy<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AbstractStream> AbstractStream for StreamProxy<S> {
    fn push(&mut self, data: &[u8]) -> bool {
        self.inner.push(data)
    }

    fn push_block(&mut self) -> bool {
        self.inner.push_block()
    }

    fn pop(&mut self, out: &mut [u8]) -> bool {
        self.inner.pop(out)
    }

    fn reserve(&mut self) -> Option<&mut [u8]> {
        self.inner.reserve()
    }

    fn commit(&mut self) {
        self.inner.commit()
    }

    fn release(&mut self) {
        self.inner.release()
    }

    fn peek(&mut self) -> Option<&[u8]> {
        self.inner.peek()
    }

    fn unpeek(&mut self) {
        self.inner.unpeek()
    }

    fn consume(&mut self) {
        self.inner.consume()
    }

    fn reset(&mut self) {
        self.inner.reset()
    }

    fn register_listener(&mut self, listener: Arc<dyn EventListener>) {
        self.inner.register_listener(listener)
    }

    fn unregister_listeners(&mut self, listener: &Arc<dyn EventListener>) {
        self.inner.unregister_listeners(listener)
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    fn blocks_available(&self) -> bool {
        self.inner.blocks_available()
    }

    fn used_block_count(&self) -> usize {
        self.inner.used_block_count()
    }

    fn block_count(&self) -> usize {
        self.inner.block_count()
    }

    fn peeked_count(&self) -> usize {
        self.inner.peeked_count()
    }

    fn reserved_count(&self) -> usize {
        self.inner.reserved_count()
    }

    fn input_traits(&self) -> StreamTraits {
        self.inner.input_traits()
    }

    fn output_traits(&self) -> StreamTraits {
        self.inner.output_traits()
    }
}
