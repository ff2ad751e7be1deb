use super::{Transform, check_output};
use crate::format::AudioFormat;

/// Identity transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullTransform;

impl Transform for NullTransform {
    fn transform<'o>(&self, input: &[u8], output: &'o mut [u8]) -> &'o mut [u8] {
        check_output(input.len(), output.len());
        let output = &mut output[..input.len()];
        output.copy_from_slice(input);
        output
    }

    fn transform_in_place<'b>(&self, buffer: &'b mut [u8], input_len: usize) -> &'b mut [u8] {
        check_output(input_len, buffer.len());
        &mut buffer[..input_len]
    }

    fn transform_block_size(&self, input_bytes: usize) -> usize {
        input_bytes
    }

    fn transform_block_size_inverted(&self, output_bytes: usize) -> usize {
        output_bytes
    }

    fn validate_input_format(&self, _format: &AudioFormat) -> bool {
        true
    }

    fn transform_format(&self, format: &AudioFormat) -> AudioFormat {
        *format
    }
}
