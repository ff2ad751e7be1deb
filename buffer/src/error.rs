//! Error types for stream construction.
//!
//! Only factories fail with an [`Error`]. Buffer operations on a built
//! stream report failure through `bool`/`Option` and never leave a
//! partially mutated stream behind.

/// Result type alias for pcmpipe-buffer.
pub type Result<T> = std::result::Result<T, Error>;

/// Stream construction error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested format is null or not accepted by the transform.
    #[error("stream: invalid format: {0}")]
    InvalidFormat(String),

    /// No transform exists for the requested conversion.
    ///
    /// Produced when a `TransformFactory` result is propagated with `?`.
    #[error("stream: unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// Endpoint constraints cannot be satisfied together.
    #[error("stream: incompatible constraints: {0}")]
    IncompatibleConstraints(String),

    /// Neither the endpoints nor the factory say how large a block should be.
    #[error("stream: insufficient configuration: {0}")]
    InsufficientConfiguration(String),
}

/// Category of an [`Error`], for callers deciding on a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    UnsupportedConversion,
    IncompatibleConstraints,
    InsufficientConfiguration,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Error::UnsupportedConversion(_) => ErrorKind::UnsupportedConversion,
            Error::IncompatibleConstraints(_) => ErrorKind::IncompatibleConstraints,
            Error::InsufficientConfiguration(_) => ErrorKind::InsufficientConfiguration,
        }
    }
}

impl From<pcmpipe_audio::Error> for Error {
    fn from(e: pcmpipe_audio::Error) -> Self {
        match e {
            pcmpipe_audio::Error::InvalidFormat(msg) => Error::InvalidFormat(msg),
            pcmpipe_audio::Error::UnsupportedConversion { from, to } => {
                Error::UnsupportedConversion(format!("{} -> {}", from, to))
            }
        }
    }
}
