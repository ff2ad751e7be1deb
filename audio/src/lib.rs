//! PCM audio formats and block transcoding.
//!
//! This crate provides the format and conversion half of the pcmpipe audio
//! core:
//!
//! - [`AudioFormat`]: sample rate, bit width and channel count of a PCM stream
//! - [`transcode`]: the [`Transform`](transcode::Transform) strategies
//!   (identity, mono to stereo, integer-ratio interpolation and decimation,
//!   composition) and the [`TransformFactory`](transcode::TransformFactory)
//!   that picks one for a pair of formats
//!
//! # Example
//!
//! ```
//! use pcmpipe_audio::AudioFormat;
//! use pcmpipe_audio::transcode::{Transform, TransformFactory};
//!
//! let source = AudioFormat::new(16000, 16, 1);
//! let sink = AudioFormat::new(32000, 16, 2);
//!
//! let transform = TransformFactory::new().make_transform(&source, &sink).unwrap();
//! assert_eq!(transform.transform_format(&source), sink);
//! assert_eq!(transform.transform_block_size(64), 256);
//! ```

mod error;
mod format;
pub mod transcode;

pub use error::{Error, Result};
pub use format::AudioFormat;
