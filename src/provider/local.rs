//! Host-provided local model backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ModelOptions;

use super::LanguageModelBackend;

/// Availability status reported by a local model host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    Unavailable,
    Downloadable,
    Downloading,
    Available,
    /// A status string this crate does not know about.
    Other(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Downloadable => "downloadable",
            Self::Downloading => "downloading",
            Self::Available => "available",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Availability {
    fn from(status: &str) -> Self {
        match status {
            "unavailable" => Self::Unavailable,
            "downloadable" => Self::Downloadable,
            "downloading" => Self::Downloading,
            "available" => Self::Available,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Availability {
    fn from(status: String) -> Self {
        Self::from(status.as_str())
    }
}

impl From<Availability> for String {
    fn from(availability: Availability) -> Self {
        availability.as_str().to_string()
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point to a model served by the host environment.
///
/// Injected into the resolver so backend presence is explicit. Only an
/// [`Availability::Available`] status selects the local backend.
#[async_trait]
pub trait LocalModelHost: Send + Sync {
    /// Whether the host exposes a local model API at all.
    fn is_present(&self) -> bool {
        true
    }

    /// Current availability of the local model.
    async fn availability(&self) -> Result<Availability>;

    /// Create a session with the caller's options. The returned backend
    /// declares its own capabilities.
    async fn create(&self, options: &ModelOptions) -> Result<Arc<dyn LanguageModelBackend>>;
}
