use std::sync::Arc;

use super::{Transform, check_output};
use crate::format::AudioFormat;

/// An ordered chain of transforms applied one after another.
#[derive(Debug, Clone)]
pub struct TransformComposite {
    stages: Vec<Arc<dyn Transform>>,
}

impl TransformComposite {
    /// Creates a chain from `stages`, applied first to last.
    ///
    /// # Panics
    ///
    /// Panics if `stages` is empty.
    pub fn new(stages: Vec<Arc<dyn Transform>>) -> Self {
        assert!(!stages.is_empty(), "composite needs at least one stage");
        Self { stages }
    }

    /// Returns the stages in application order.
    pub fn stages(&self) -> &[Arc<dyn Transform>] {
        &self.stages
    }

    // Largest intermediate size seen while threading `input_bytes` through
    // every stage, input included.
    fn working_size(&self, input_bytes: usize) -> usize {
        let mut size = input_bytes;
        let mut max = size;
        for stage in &self.stages {
            size = stage.transform_block_size(size);
            max = max.max(size);
        }
        max
    }

    fn run_in_place(&self, buffer: &mut [u8], input_len: usize) -> usize {
        self.stages.iter().fold(input_len, |len, stage| {
            stage.transform_in_place(buffer, len).len()
        })
    }
}

impl Transform for TransformComposite {
    fn transform<'o>(&self, input: &[u8], output: &'o mut [u8]) -> &'o mut [u8] {
        let out_len = self.transform_block_size(input.len());
        check_output(out_len, output.len());

        let working = self.working_size(input.len());
        if output.len() >= working {
            output[..input.len()].copy_from_slice(input);
            let len = self.run_in_place(output, input.len());
            return &mut output[..len];
        }

        // output cannot hold an intermediate stage
        let mut scratch = vec![0u8; working];
        scratch[..input.len()].copy_from_slice(input);
        let len = self.run_in_place(&mut scratch, input.len());
        output[..len].copy_from_slice(&scratch[..len]);
        &mut output[..len]
    }

    fn transform_in_place<'b>(&self, buffer: &'b mut [u8], input_len: usize) -> &'b mut [u8] {
        check_output(self.working_size(input_len), buffer.len());
        let len = self.run_in_place(buffer, input_len);
        &mut buffer[..len]
    }

    fn transform_block_size(&self, input_bytes: usize) -> usize {
        self.stages
            .iter()
            .fold(input_bytes, |size, stage| stage.transform_block_size(size))
    }

    fn transform_block_size_inverted(&self, output_bytes: usize) -> usize {
        self.stages
            .iter()
            .rev()
            .fold(output_bytes, |size, stage| stage.transform_block_size_inverted(size))
    }

    fn validate_input_format(&self, format: &AudioFormat) -> bool {
        let mut current = *format;
        for stage in &self.stages {
            if !stage.validate_input_format(&current) {
                return false;
            }
            current = stage.transform_format(&current);
        }
        true
    }

    fn transform_format(&self, format: &AudioFormat) -> AudioFormat {
        self.stages
            .iter()
            .fold(*format, |current, stage| stage.transform_format(&current))
    }
}
