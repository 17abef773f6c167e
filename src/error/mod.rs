//! Error types for hybrid-lm.

pub mod kind;

pub use kind::ErrorKind;

use thiserror::Error;

/// Primary error type for all facade operations.
#[derive(Error, Debug)]
pub enum LanguageModelError {
    #[error("Transport error (status {status}): {message}")]
    Transport { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Model construction failed: {source}")]
    Construction {
        #[source]
        source: Box<LanguageModelError>,
    },

    #[error("Local backend probe failed: {0}")]
    CapabilityProbe(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl LanguageModelError {
    /// Create a transport error from a non-success response.
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Wrap a failure raised while building a facade.
    ///
    /// Already-wrapped errors are returned unchanged so the chain stays one level deep.
    pub fn construction(source: LanguageModelError) -> Self {
        match source {
            err @ Self::Construction { .. } => err,
            other => Self::Construction {
                source: Box::new(other),
            },
        }
    }

    /// Classify this error into the facade's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Network(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Construction { .. } => ErrorKind::Construction,
            Self::CapabilityProbe(_) => ErrorKind::CapabilityProbe,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Configuration(_) | Self::Io(_) => ErrorKind::Configuration,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Whether a caller could reasonably retry the failed operation.
    ///
    /// The facade never retries on its own; generation calls may incur
    /// duplicate cost when retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Transport { status, .. } => matches!(status, 429 | 500..=599),
            Self::Construction { source } => source.is_retryable(),
            _ => false,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Construction { source } => source.status(),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LanguageModelError>;
