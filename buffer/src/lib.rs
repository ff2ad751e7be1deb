//! Block-structured PCM streams.
//!
//! This crate provides the buffering half of the pcmpipe audio core: a
//! fixed-capacity FIFO of equal-size audio blocks, the wrappers that sit in
//! front of it, and the factory that sizes it for a producer and a consumer.
//!
//! - [`Stream`]: the block ring buffer, with copying and zero-copy access
//! - [`StreamProxy`]: forwards every operation to a wrapped stream
//! - [`InputTranscodeProxy`]: runs a [`Transform`](pcmpipe_audio::transcode::Transform)
//!   on everything written into a wrapped stream
//! - [`SharedStream`]: a mutex-guarded handle for producer and consumer threads
//! - [`StreamFactory`]: negotiates block size and count from [`Source`] and
//!   [`Sink`] constraints
//!
//! # Copying Access
//!
//! ```
//! use pcmpipe_audio::AudioFormat;
//! use pcmpipe_buffer::{AbstractStream, StandardAllocator, Stream};
//!
//! let mut stream = Stream::new(AudioFormat::STEREO_44K_16, &StandardAllocator, 4, 2);
//! assert!(stream.push(&[1, 2, 3, 4]));
//!
//! let mut out = [0u8; 4];
//! assert!(stream.pop(&mut out));
//! assert_eq!(out, [1, 2, 3, 4]);
//! ```
//!
//! # Zero-copy Access
//!
//! `reserve` lends the next free block to a writer and `peek` lends the
//! oldest unread block to a reader. Neither moves data until `commit` or
//! `consume` is called.
//!
//! ```
//! use pcmpipe_audio::AudioFormat;
//! use pcmpipe_buffer::{AbstractStream, StandardAllocator, Stream};
//!
//! let mut stream = Stream::new(AudioFormat::MONO_8K_16, &StandardAllocator, 2, 4);
//!
//! stream.reserve().unwrap().copy_from_slice(&[7, 7]);
//! stream.commit();
//!
//! assert_eq!(stream.peek().unwrap(), &[7, 7]);
//! stream.consume();
//! assert!(stream.is_empty());
//! ```
//!
//! # Failure
//!
//! Buffer operations report failure with `false` or `None` and leave the
//! stream untouched. Only the factory returns an [`Error`].

mod abstract_stream;
mod allocator;
mod endpoint;
mod error;
mod factory;
mod proxy;
mod raw_block_iterator;
mod shared;
mod stream;
mod transcode_proxy;

pub use abstract_stream::{AbstractStream, Event, EventListener, ListenerFunc, StreamTraits};
pub use allocator::{Allocator, StandardAllocator};
pub use endpoint::{Endpoint, EndpointTraits, Sink, Source};
pub use error::{Error, ErrorKind, Result};
pub use factory::{StreamFactory, StreamFactoryConfig};
pub use proxy::StreamProxy;
pub use raw_block_iterator::RawBlockIterator;
pub use shared::SharedStream;
pub use stream::{DEFAULT_BLOCK_COUNT, Stream};
pub use transcode_proxy::InputTranscodeProxy;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Stream>();
        assert_send_sync::<InputTranscodeProxy<Stream>>();
        assert_send_sync::<SharedStream<Stream>>();
        assert_send_sync::<StreamFactory>();
    }

    #[test]
    fn test_handles_are_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<SharedStream<Stream>>();
        assert_clone::<StreamFactory>();
        assert_clone::<StreamFactoryConfig>();
    }
}
