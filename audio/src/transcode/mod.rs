//! Block transcoding between PCM formats.
//!
//! A [`Transform`] maps one block of interleaved PCM bytes in an input
//! format to a block in an output format. Transforms are stateless, so a
//! single instance can be shared as `Arc<dyn Transform>` between every
//! stream that needs the same conversion.
//!
//! # Example
//!
//! ```
//! use pcmpipe_audio::AudioFormat;
//! use pcmpipe_audio::transcode::{MonoToStereo, Transform};
//!
//! let m2s = MonoToStereo::<u16>::new();
//! assert!(m2s.validate_input_format(&AudioFormat::new(44100, 16, 1)));
//!
//! let input: Vec<u8> = [1u16, 2].iter().flat_map(|s| s.to_ne_bytes()).collect();
//! let mut output = [0u8; 8];
//! let written = m2s.transform(&input, &mut output);
//! assert_eq!(written.len(), 8);
//! ```

mod composite;
mod decimator;
mod factory;
mod interpolator;
mod mono_to_stereo;
mod null;

use std::fmt;

use crate::format::AudioFormat;

pub use composite::TransformComposite;
pub use decimator::BasicDecimator;
pub use factory::TransformFactory;
pub use interpolator::BasicInterpolator;
pub use mono_to_stereo::MonoToStereo;
pub use null::NullTransform;

/// A pure mapping from one block of PCM bytes to another.
pub trait Transform: Send + Sync + fmt::Debug {
    /// Transforms `input` into `output` and returns the written prefix of
    /// `output`.
    ///
    /// # Panics
    ///
    /// Panics if `output` is shorter than `transform_block_size(input.len())`.
    fn transform<'o>(&self, input: &[u8], output: &'o mut [u8]) -> &'o mut [u8];

    /// Transforms `buffer[..input_len]` within the same memory.
    ///
    /// The result starts at `buffer[0]`; bytes past the result are left as
    /// they were.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` cannot hold both the input and the result.
    fn transform_in_place<'b>(&self, buffer: &'b mut [u8], input_len: usize) -> &'b mut [u8];

    /// Number of output bytes produced from `input_bytes`.
    fn transform_block_size(&self, input_bytes: usize) -> usize;

    /// Number of input bytes needed to produce `output_bytes`.
    fn transform_block_size_inverted(&self, output_bytes: usize) -> usize;

    /// Returns true if this transform accepts `format` as input.
    fn validate_input_format(&self, format: &AudioFormat) -> bool;

    /// The format produced from `format`.
    fn transform_format(&self, format: &AudioFormat) -> AudioFormat;
}

mod sealed {
    pub trait Sealed {}
}

/// An integer PCM sample type.
pub trait Sample: sealed::Sealed + Copy + Send + Sync + fmt::Debug + 'static {
    /// Size of one sample in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();
    /// Size of one sample in bits.
    const BIT_WIDTH: u16 = (std::mem::size_of::<Self>() * 8) as u16;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}
            impl Sample for $t {}
        )*
    };
}

impl_sample!(u8, i16, u16, i32, u32);

pub(crate) fn check_output(needed: usize, available: usize) {
    assert!(
        available >= needed,
        "transform output too small: need {} bytes, have {}",
        needed,
        available
    );
}
