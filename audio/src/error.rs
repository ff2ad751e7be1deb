//! Error types for format negotiation and transform selection.

use crate::format::AudioFormat;

/// Result type alias for pcmpipe-audio.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned when no transform can be built for a pair of formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A format is null or the two formats are fundamentally incompatible
    /// (e.g. different bit widths).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The conversion is well-formed but not implemented.
    #[error("unsupported conversion: {from} -> {to}")]
    UnsupportedConversion { from: AudioFormat, to: AudioFormat },
}
