use std::sync::Arc;

use super::{
    BasicDecimator, BasicInterpolator, MonoToStereo, NullTransform, Transform, TransformComposite,
};
use crate::error::{Error, Result};
use crate::format::AudioFormat;

/// The only rate ratio the basic interpolator/decimator pair is built for.
const RATE_FACTOR: u32 = 2;

/// Picks the transform converting one format into another.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformFactory;

// Instantiates a generic transform for a runtime (bit width, channels) pair.
macro_rules! sized_transform {
    ($kind:ident, $width:expr, $channels:expr, $factor:literal) => {
        match ($width, $channels) {
            (8, 1) => Some(Arc::new($kind::<u8, 1, $factor>::new()) as Arc<dyn Transform>),
            (8, 2) => Some(Arc::new($kind::<u8, 2, $factor>::new()) as Arc<dyn Transform>),
            (16, 1) => Some(Arc::new($kind::<u16, 1, $factor>::new()) as Arc<dyn Transform>),
            (16, 2) => Some(Arc::new($kind::<u16, 2, $factor>::new()) as Arc<dyn Transform>),
            (32, 1) => Some(Arc::new($kind::<u32, 1, $factor>::new()) as Arc<dyn Transform>),
            (32, 2) => Some(Arc::new($kind::<u32, 2, $factor>::new()) as Arc<dyn Transform>),
            _ => None,
        }
    };
}

impl TransformFactory {
    /// Creates a factory.
    pub const fn new() -> Self {
        Self
    }

    /// Returns a transform converting `source` blocks into `sink` blocks.
    ///
    /// Rate conversion (when needed) runs first at the source channel count,
    /// followed by mono to stereo expansion.
    pub fn make_transform(
        &self,
        source: &AudioFormat,
        sink: &AudioFormat,
    ) -> Result<Arc<dyn Transform>> {
        if source.is_null() || sink.is_null() {
            return Err(Error::InvalidFormat(format!(
                "null format in conversion {} -> {}",
                source, sink
            )));
        }
        if source.bit_width != sink.bit_width {
            return Err(Error::InvalidFormat(format!(
                "bit width conversion {} -> {} is not supported",
                source.bit_width, sink.bit_width
            )));
        }
        if source == sink {
            return Ok(Arc::new(NullTransform));
        }

        let unsupported = || Error::UnsupportedConversion {
            from: *source,
            to: *sink,
        };

        let mut stages: Vec<Arc<dyn Transform>> = Vec::with_capacity(2);
        if source.sample_rate != sink.sample_rate {
            stages.push(self.rate_transform(source, sink).ok_or_else(unsupported)?);
        }
        if source.channels != sink.channels {
            stages.push(self.channel_transform(source, sink).ok_or_else(unsupported)?);
        }

        if stages.len() == 1 {
            Ok(stages.remove(0))
        } else {
            Ok(Arc::new(TransformComposite::new(stages)))
        }
    }

    fn rate_transform(&self, source: &AudioFormat, sink: &AudioFormat) -> Option<Arc<dyn Transform>> {
        if !matches!(source.channels, 1 | 2) {
            return None;
        }
        if source.sample_rate.checked_mul(RATE_FACTOR) == Some(sink.sample_rate) {
            sized_transform!(BasicInterpolator, source.bit_width, source.channels, 2)
        } else if sink.sample_rate.checked_mul(RATE_FACTOR) == Some(source.sample_rate) {
            sized_transform!(BasicDecimator, source.bit_width, source.channels, 2)
        } else {
            None
        }
    }

    fn channel_transform(
        &self,
        source: &AudioFormat,
        sink: &AudioFormat,
    ) -> Option<Arc<dyn Transform>> {
        if (source.channels, sink.channels) != (1, 2) {
            return None;
        }
        match source.bit_width {
            8 => Some(Arc::new(MonoToStereo::<u8>::new())),
            16 => Some(Arc::new(MonoToStereo::<u16>::new())),
            32 => Some(Arc::new(MonoToStereo::<u32>::new())),
            _ => None,
        }
    }
}
