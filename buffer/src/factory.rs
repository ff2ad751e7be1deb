//! Stream construction from endpoint constraints.

use std::sync::Arc;
use std::time::Duration;

use pcmpipe_audio::AudioFormat;
use pcmpipe_audio::transcode::Transform;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allocator::{Allocator, StandardAllocator};
use crate::endpoint::{Sink, Source};
use crate::error::{Error, Result};
use crate::stream::{DEFAULT_BLOCK_COUNT, Stream};
use crate::transcode_proxy::InputTranscodeProxy;

/// Stream factory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamFactoryConfig {
    /// Block duration used when no endpoint constrains the block size.
    pub time_constraint: Duration,
    /// Lower bound on the number of blocks in a stream.
    pub default_block_count: usize,
}

impl Default for StreamFactoryConfig {
    fn default() -> Self {
        Self {
            time_constraint: Duration::ZERO,
            default_block_count: DEFAULT_BLOCK_COUNT,
        }
    }
}

impl StreamFactoryConfig {
    /// Set the fallback block duration.
    pub fn with_time_constraint(mut self, duration: Duration) -> Self {
        self.time_constraint = duration;
        self
    }

    /// Set the minimum block count.
    pub fn with_default_block_count(mut self, count: usize) -> Self {
        self.default_block_count = count;
        self
    }
}

/// Builds streams sized to satisfy a source and a sink.
///
/// # Negotiation
///
/// The block size comes from the endpoints' block size constraints when
/// either declares one. Two constraints must be equal or one a whole
/// multiple of the other, in which case the larger wins. Without endpoint
/// constraints the block size is the configured time constraint worth of
/// frames in the requested format.
///
/// The block count starts at the configured default and grows until the
/// stream can hold the longer of the endpoints' time constraints.
///
/// ```
/// use std::time::Duration;
/// use pcmpipe_audio::AudioFormat;
/// use pcmpipe_buffer::{AbstractStream, Endpoint, EndpointTraits, Sink, Source, StreamFactory};
///
/// struct Mic;
/// impl Endpoint for Mic {
///     fn traits(&self) -> EndpointTraits { EndpointTraits::default() }
/// }
/// impl Source for Mic {
///     fn source_format(&self) -> AudioFormat { AudioFormat::MONO_16K_16 }
/// }
///
/// struct Speaker;
/// impl Endpoint for Speaker {
///     fn traits(&self) -> EndpointTraits { EndpointTraits::default() }
/// }
/// impl Sink for Speaker {
///     fn sink_format(&self) -> AudioFormat { AudioFormat::MONO_16K_16 }
/// }
///
/// let factory = StreamFactory::new(Duration::from_millis(2));
/// let stream = factory.make_stream(&Mic, &Speaker, AudioFormat::MONO_16K_16).unwrap();
/// assert_eq!(stream.input_traits().block_size, 64);
/// assert_eq!(stream.block_count(), 32);
/// ```
#[derive(Clone)]
pub struct StreamFactory {
    config: StreamFactoryConfig,
    allocator: Arc<dyn Allocator>,
}

impl StreamFactory {
    /// Creates a factory that falls back to `time_constraint` long blocks.
    pub fn new(time_constraint: Duration) -> Self {
        Self::from_config(StreamFactoryConfig::default().with_time_constraint(time_constraint))
    }

    pub fn from_config(config: StreamFactoryConfig) -> Self {
        Self {
            config,
            allocator: Arc::new(StandardAllocator),
        }
    }

    /// Use `allocator` for the arenas of new streams.
    pub fn with_allocator(mut self, allocator: Arc<dyn Allocator>) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn config(&self) -> &StreamFactoryConfig {
        &self.config
    }

    /// Builds a stream of `format` that satisfies both endpoints.
    pub fn make_stream(
        &self,
        source: &dyn Source,
        sink: &dyn Sink,
        format: AudioFormat,
    ) -> Result<Stream> {
        if format.is_null() || format.bytes_per_frame() == 0 {
            warn!("stream factory: rejecting format {}", format);
            return Err(Error::InvalidFormat(format!("cannot build a stream of {}", format)));
        }

        let source_traits = source.traits();
        let sink_traits = sink.traits();

        let block_size = self.resolve_block_size(
            source_traits.block_size_constraint,
            sink_traits.block_size_constraint,
            &format,
        )?;
        let block_duration = format.bytes_to_duration(block_size);
        let time_constraint = source_traits.time_constraint.max(sink_traits.time_constraint);
        let block_count = self.resolve_block_count(time_constraint, block_duration);
        if block_size
            .checked_mul(block_count)
            .is_none_or(|arena| arena > isize::MAX as usize)
        {
            warn!(
                "stream factory: {} blocks of {} bytes do not fit in memory",
                block_count, block_size
            );
            return Err(Error::IncompatibleConstraints(format!(
                "{:?} of {} needs more than the addressable arena size",
                time_constraint, format
            )));
        }

        debug!(
            "stream factory: {} blocks of {} bytes ({:?} each) for {}",
            block_count, block_size, block_duration, format
        );
        Ok(Stream::new(
            format,
            self.allocator.as_ref(),
            block_size,
            block_count,
        ))
    }

    /// Builds a stream whose writers supply `format` and whose readers get
    /// `transform.transform_format(format)`.
    pub fn make_input_transcoding_stream(
        &self,
        source: &dyn Source,
        sink: &dyn Sink,
        format: AudioFormat,
        transform: Arc<dyn Transform>,
    ) -> Result<InputTranscodeProxy<Stream>> {
        if format.is_null()
            || format.bytes_per_frame() == 0
            || !transform.validate_input_format(&format)
        {
            warn!("stream factory: {:?} rejects input format {}", transform, format);
            return Err(Error::InvalidFormat(format!(
                "transform does not accept {}",
                format
            )));
        }

        let stream = self.make_stream(source, sink, transform.transform_format(&format))?;
        let native = stream.block_size();
        let input_size = transform.transform_block_size_inverted(native);
        if input_size == 0
            || input_size % format.bytes_per_frame() != 0
            || transform.transform_block_size(input_size) != native
        {
            warn!(
                "stream factory: block size {} has no exact pre-transform size",
                native
            );
            return Err(Error::IncompatibleConstraints(format!(
                "block size {} cannot be produced from whole input blocks",
                native
            )));
        }

        Ok(InputTranscodeProxy::new(stream, transform))
    }

    fn resolve_block_size(
        &self,
        source_constraint: usize,
        sink_constraint: usize,
        format: &AudioFormat,
    ) -> Result<usize> {
        let block_size = match (source_constraint, sink_constraint) {
            (0, 0) => return self.block_size_from_time(format),
            (0, size) | (size, 0) => size,
            (a, b) if a == b => a,
            (a, b) => {
                let (small, large) = if a < b { (a, b) } else { (b, a) };
                if large % small != 0 {
                    warn!(
                        "stream factory: incompatible block sizes: source {}, sink {}",
                        a, b
                    );
                    return Err(Error::IncompatibleConstraints(format!(
                        "source block size {} and sink block size {}",
                        a, b
                    )));
                }
                large
            }
        };

        if block_size % format.bytes_per_frame() != 0 {
            warn!(
                "stream factory: block size {} is not whole frames of {}",
                block_size, format
            );
            return Err(Error::IncompatibleConstraints(format!(
                "block size {} is not a whole number of {} byte frames",
                block_size,
                format.bytes_per_frame()
            )));
        }
        Ok(block_size)
    }

    fn block_size_from_time(&self, format: &AudioFormat) -> Result<usize> {
        let time_constraint = self.config.time_constraint;
        if time_constraint.is_zero() {
            warn!("stream factory: no block size constraint and no time constraint");
            return Err(Error::InsufficientConfiguration(
                "no endpoint block size and no factory time constraint".into(),
            ));
        }
        match format.duration_to_bytes(time_constraint) {
            0 => Err(Error::InsufficientConfiguration(format!(
                "{:?} is shorter than one frame of {}",
                time_constraint, format
            ))),
            size => Ok(size),
        }
    }

    fn resolve_block_count(&self, time_constraint: Duration, block_duration: Duration) -> usize {
        let default = self.config.default_block_count.max(1);
        if time_constraint.is_zero() || block_duration.is_zero() {
            return default;
        }
        let needed = time_constraint.as_nanos().div_ceil(block_duration.as_nanos());
        default.max(usize::try_from(needed).unwrap_or(usize::MAX))
    }
}

impl std::fmt::Debug for StreamFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
