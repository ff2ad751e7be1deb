//! Producer and consumer capabilities used during stream negotiation.

use std::time::Duration;

use pcmpipe_audio::AudioFormat;
use serde::{Deserialize, Serialize};

/// Capabilities an endpoint declares. Zero means unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointTraits {
    /// Block size in bytes the endpoint requires.
    pub block_size_constraint: usize,
    /// Minimum amount of audio the stream must be able to hold.
    pub time_constraint: Duration,
}

impl EndpointTraits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required block size in bytes.
    pub fn block_size_constraint(mut self, bytes: usize) -> Self {
        self.block_size_constraint = bytes;
        self
    }

    /// Set the minimum buffered duration.
    pub fn time_constraint(mut self, duration: Duration) -> Self {
        self.time_constraint = duration;
        self
    }
}

/// Common surface of a [`Source`] or [`Sink`].
pub trait Endpoint {
    fn traits(&self) -> EndpointTraits;

    /// Formats the endpoint can work with, if it advertises any.
    fn supported_formats(&self) -> Vec<AudioFormat> {
        Vec::new()
    }
}

/// An audio producer such as a microphone or a decoder.
pub trait Source: Endpoint {
    /// Format of the audio it produces.
    fn source_format(&self) -> AudioFormat;
}

/// An audio consumer such as a speaker or an encoder.
pub trait Sink: Endpoint {
    /// Format of the audio it consumes.
    fn sink_format(&self) -> AudioFormat;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mic;

    impl Endpoint for Mic {
        fn traits(&self) -> EndpointTraits {
            EndpointTraits::new().time_constraint(Duration::from_millis(20))
        }
    }

    impl Source for Mic {
        fn source_format(&self) -> AudioFormat {
            AudioFormat::MONO_16K_16
        }
    }

    #[test]
    fn test_default_is_unconstrained() {
        let traits = EndpointTraits::default();
        assert_eq!(traits.block_size_constraint, 0);
        assert_eq!(traits.time_constraint, Duration::ZERO);
    }

    #[test]
    fn test_builder() {
        let traits = EndpointTraits::new()
            .block_size_constraint(512)
            .time_constraint(Duration::from_millis(40));
        assert_eq!(traits.block_size_constraint, 512);
        assert_eq!(traits.time_constraint, Duration::from_millis(40));
    }

    #[test]
    fn test_source_defaults() {
        let mic = Mic;
        assert!(mic.supported_formats().is_empty());
        assert_eq!(mic.source_format(), AudioFormat::MONO_16K_16);
        assert_eq!(mic.traits().time_constraint, Duration::from_millis(20));
    }

    #[test]
    fn test_serde() {
        let traits: EndpointTraits =
            serde_json::from_str(r#"{"block_size_constraint": 256}"#).unwrap();
        assert_eq!(traits.block_size_constraint, 256);
        assert_eq!(traits.time_constraint, Duration::ZERO);

        let json = serde_json::to_string(&traits).unwrap();
        let back: EndpointTraits = serde_json::from_str(&json).unwrap();
        assert_eq!(back, traits);
    }
}
