//! Backend trait and implementations.

pub mod http;
pub mod local;
pub mod remote;

pub use local::{Availability, LocalModelHost};
pub use remote::{RemoteBackend, RemoteTransport};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Result;
use crate::stream::TextStream;
use crate::types::{Capabilities, CreateOptions, Message};

/// Which kind of backend answers a facade's calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    Local,
    Remote,
}

/// Core trait implemented by every backend a facade can delegate to.
///
/// Each call is independent: it carries the facade's options and a normalized
/// conversation, and must not mutate backend state visible to other calls.
#[async_trait]
pub trait LanguageModelBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Sampling limits and defaults this backend declares.
    fn capabilities(&self) -> &Capabilities;

    /// Generate the complete response.
    async fn prompt(&self, options: &CreateOptions, inputs: &[Message]) -> Result<String>;

    /// Generate the response as a stream of text chunks.
    async fn prompt_streaming(
        &self,
        options: &CreateOptions,
        inputs: &[Message],
    ) -> Result<TextStream>;

    /// Count the tokens the conversation would consume.
    async fn count_tokens(&self, options: &CreateOptions, inputs: &[Message]) -> Result<u64>;
}
