use std::marker::PhantomData;

use super::{Sample, Transform, check_output};
use crate::format::AudioFormat;

/// Duplicates every mono sample into an interleaved left/right pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoToStereo<T = u16> {
    _sample: PhantomData<T>,
}

impl<T: Sample> MonoToStereo<T> {
    /// Creates the transform.
    pub const fn new() -> Self {
        Self {
            _sample: PhantomData,
        }
    }
}

impl<T: Sample> Transform for MonoToStereo<T> {
    fn transform<'o>(&self, input: &[u8], output: &'o mut [u8]) -> &'o mut [u8] {
        let out_len = self.transform_block_size(input.len());
        check_output(out_len, output.len());
        let output = &mut output[..out_len];
        for (sample, pair) in input
            .chunks_exact(T::SIZE)
            .zip(output.chunks_exact_mut(2 * T::SIZE))
        {
            pair[..T::SIZE].copy_from_slice(sample);
            pair[T::SIZE..].copy_from_slice(sample);
        }
        output
    }

    fn transform_in_place<'b>(&self, buffer: &'b mut [u8], input_len: usize) -> &'b mut [u8] {
        let out_len = self.transform_block_size(input_len);
        check_output(out_len, buffer.len());
        // back to front: every destination lies at or after its source
        for i in (0..input_len / T::SIZE).rev() {
            let src = i * T::SIZE;
            buffer.copy_within(src..src + T::SIZE, 2 * src + T::SIZE);
            buffer.copy_within(src..src + T::SIZE, 2 * src);
        }
        &mut buffer[..out_len]
    }

    fn transform_block_size(&self, input_bytes: usize) -> usize {
        input_bytes * 2
    }

    fn transform_block_size_inverted(&self, output_bytes: usize) -> usize {
        output_bytes / 2
    }

    fn validate_input_format(&self, format: &AudioFormat) -> bool {
        format.channels == 1
    }

    fn transform_format(&self, format: &AudioFormat) -> AudioFormat {
        format.with_channels(2)
    }
}
