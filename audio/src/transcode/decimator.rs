use std::marker::PhantomData;

use super::{Sample, Transform, check_output};
use crate::format::AudioFormat;

/// Downsamples by keeping every `FACTOR`-th `CHANNELS`-wide frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicDecimator<T, const CHANNELS: usize, const FACTOR: usize> {
    _sample: PhantomData<T>,
}

impl<T: Sample, const CHANNELS: usize, const FACTOR: usize> BasicDecimator<T, CHANNELS, FACTOR> {
    const FRAME_SIZE: usize = T::SIZE * CHANNELS;

    /// Creates the decimator.
    pub const fn new() -> Self {
        assert!(CHANNELS > 0 && FACTOR > 0);
        Self {
            _sample: PhantomData,
        }
    }
}

impl<T: Sample, const CHANNELS: usize, const FACTOR: usize> Transform
    for BasicDecimator<T, CHANNELS, FACTOR>
{
    fn transform<'o>(&self, input: &[u8], output: &'o mut [u8]) -> &'o mut [u8] {
        let out_len = self.transform_block_size(input.len());
        check_output(out_len, output.len());
        let output = &mut output[..out_len];
        for (kept, slot) in input
            .chunks_exact(Self::FRAME_SIZE)
            .step_by(FACTOR)
            .zip(output.chunks_exact_mut(Self::FRAME_SIZE))
        {
            slot.copy_from_slice(kept);
        }
        output
    }

    fn transform_in_place<'b>(&self, buffer: &'b mut [u8], input_len: usize) -> &'b mut [u8] {
        check_output(input_len, buffer.len());
        let out_len = self.transform_block_size(input_len);
        let fs = Self::FRAME_SIZE;
        for i in 0..out_len / fs {
            let src = i * FACTOR * fs;
            buffer.copy_within(src..src + fs, i * fs);
        }
        &mut buffer[..out_len]
    }

    fn transform_block_size(&self, input_bytes: usize) -> usize {
        input_bytes / FACTOR
    }

    fn transform_block_size_inverted(&self, output_bytes: usize) -> usize {
        output_bytes * FACTOR
    }

    fn validate_input_format(&self, format: &AudioFormat) -> bool {
        format.channels as usize == CHANNELS && format.bit_width == T::BIT_WIDTH
    }

    fn transform_format(&self, format: &AudioFormat) -> AudioFormat {
        format.with_sample_rate(format.sample_rate / FACTOR as u32)
    }
}
