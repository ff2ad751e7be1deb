use std::marker::PhantomData;

use super::{Sample, Transform, check_output};
use crate::format::AudioFormat;

/// Upsamples by repeating every `CHANNELS`-wide frame `FACTOR` times.
///
/// Zero-order hold: no filtering is applied, so the output contains images
/// of the input spectrum.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicInterpolator<T, const CHANNELS: usize, const FACTOR: usize> {
    _sample: PhantomData<T>,
}

impl<T: Sample, const CHANNELS: usize, const FACTOR: usize> BasicInterpolator<T, CHANNELS, FACTOR> {
    const FRAME_SIZE: usize = T::SIZE * CHANNELS;

    /// Creates the interpolator.
    pub const fn new() -> Self {
        assert!(CHANNELS > 0 && FACTOR > 0);
        Self {
            _sample: PhantomData,
        }
    }
}

impl<T: Sample, const CHANNELS: usize, const FACTOR: usize> Transform
    for BasicInterpolator<T, CHANNELS, FACTOR>
{
    fn transform<'o>(&self, input: &[u8], output: &'o mut [u8]) -> &'o mut [u8] {
        let out_len = self.transform_block_size(input.len());
        check_output(out_len, output.len());
        let output = &mut output[..out_len];
        for (frame, repeated) in input
            .chunks_exact(Self::FRAME_SIZE)
            .zip(output.chunks_exact_mut(Self::FRAME_SIZE * FACTOR))
        {
            for slot in repeated.chunks_exact_mut(Self::FRAME_SIZE) {
                slot.copy_from_slice(frame);
            }
        }
        output
    }

    fn transform_in_place<'b>(&self, buffer: &'b mut [u8], input_len: usize) -> &'b mut [u8] {
        let out_len = self.transform_block_size(input_len);
        check_output(out_len, buffer.len());
        let fs = Self::FRAME_SIZE;
        for i in (0..input_len / fs).rev() {
            let src = i * fs;
            for k in (0..FACTOR).rev() {
                buffer.copy_within(src..src + fs, (i * FACTOR + k) * fs);
            }
        }
        &mut buffer[..out_len]
    }

    fn transform_block_size(&self, input_bytes: usize) -> usize {
        input_bytes * FACTOR
    }

    fn transform_block_size_inverted(&self, output_bytes: usize) -> usize {
        output_bytes / FACTOR
    }

    fn validate_input_format(&self, format: &AudioFormat) -> bool {
        format.channels as usize == CHANNELS
            && format.sample_rate.checked_mul(FACTOR as u32).is_some()
    }

    fn transform_format(&self, format: &AudioFormat) -> AudioFormat {
        format.with_sample_rate(format.sample_rate.saturating_mul(FACTOR as u32))
    }
}
