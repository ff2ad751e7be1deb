//! Stream wrapper that transcodes on the write path.

use std::sync::Arc;

use pcmpipe_audio::transcode::Transform;
use tracing::warn;

use crate::abstract_stream::{AbstractStream, EventListener, StreamTraits};

/// Applies a [`Transform`] to every block written into the inner stream.
///
/// Writers see blocks in the transform's input domain: `reserve` lends a
/// scratch block of `transform_block_size_inverted(native block size)` bytes
/// and `commit` transforms it into a freshly reserved block of the inner
/// stream. Readers see the inner stream unchanged.
///
/// ```
/// use std::sync::Arc;
/// use pcmpipe_audio::AudioFormat;
/// use pcmpipe_audio::transcode::MonoToStereo;
/// use pcmpipe_buffer::{AbstractStream, InputTranscodeProxy, StandardAllocator, Stream};
///
/// let stream = Stream::new(AudioFormat::new(16000, 16, 2), &StandardAllocator, 8, 4);
/// let mut proxy = InputTranscodeProxy::new(stream, Arc::new(MonoToStereo::<u16>::new()));
///
/// let mono: Vec<u8> = [7u16, 9].iter().flat_map(|s| s.to_ne_bytes()).collect();
/// assert!(proxy.push(&mono));
///
/// let stereo = proxy.peek().unwrap();
/// assert_eq!(stereo.len(), 8);
/// ```
#[derive(Debug)]
pub struct InputTranscodeProxy<S> {
    inner: S,
    transform: Arc<dyn Transform>,
    transcoding_space: Box<[u8]>,
    // transformed copy handed to the inner stream's push
    transcoded_block: Box<[u8]>,
    reserved: bool,
}

impl<S: AbstractStream> InputTranscodeProxy<S> {
    /// Wraps `inner` so that writes pass through `transform`.
    ///
    /// # Panics
    ///
    /// Panics if the pre-transform block, transformed forward, does not fit
    /// in one block of `inner`.
    pub fn new(inner: S, transform: Arc<dyn Transform>) -> Self {
        let native = inner.input_traits().block_size;
        let input_size = transform.transform_block_size_inverted(native);
        assert!(
            transform.transform_block_size(input_size) <= native,
            "transcoded block does not fit the wrapped stream: {} > {}",
            transform.transform_block_size(input_size),
            native
        );
        Self {
            inner,
            transform,
            transcoding_space: vec![0u8; input_size].into_boxed_slice(),
            transcoded_block: vec![0u8; native].into_boxed_slice(),
            reserved: false,
        }
    }

    pub fn transform(&self) -> &Arc<dyn Transform> {
        &self.transform
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

impl<S: AbstractStream> AbstractStream for InputTranscodeProxy<S> {
    fn push(&mut self, data: &[u8]) -> bool {
        if self.reserved
            || self.inner.reserved_count() > 0
            || data.len() != self.transcoding_space.len()
        {
            return false;
        }
        self.transform.transform(data, &mut self.transcoded_block);
        self.inner.push(&self.transcoded_block)
    }

    fn push_block(&mut self) -> bool {
        if self.reserved {
            return false;
        }
        self.inner.push_block()
    }

    fn pop(&mut self, out: &mut [u8]) -> bool {
        self.inner.pop(out)
    }

    fn reserve(&mut self) -> Option<&mut [u8]> {
        if self.reserved || !self.inner.blocks_available() {
            return None;
        }
        self.reserved = true;
        Some(&mut self.transcoding_space[..])
    }

    fn commit(&mut self) {
        if !self.reserved {
            return;
        }
        self.reserved = false;
        match self.inner.reserve() {
            Some(block) => {
                self.transform.transform(&self.transcoding_space, block);
                self.inner.commit();
            }
            None => warn!("transcode proxy: wrapped stream has no free block, dropping commit"),
        }
    }

    fn release(&mut self) {
        self.reserved = false;
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
        self.reserved = false;
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
        !self.reserved && self.inner.blocks_available()
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
        self.inner.reserved_count() + usize::from(self.reserved)
    }

    fn input_traits(&self) -> StreamTraits {
        StreamTraits {
            block_size: self.transcoding_space.len(),
            format: self.transform.transform_format(&self.inner.input_traits().format),
        }
    }

    fn output_traits(&self) -> StreamTraits {
        self.inner.output_traits()
    }
}
