//! The language model facade callers hold.

pub mod factory;

pub use factory::ModelFactory;

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::normalize::normalize;
use crate::provider::{BackendKind, LanguageModelBackend};
use crate::stream::TextStream;
use crate::types::{Capabilities, ConversationInput, CreateOptions};

/// A ready language model, bound to one backend for its whole lifetime.
///
/// Options and limits are fixed at creation. Calls are independent and may
/// run concurrently; clones share the same options and backend.
#[derive(Clone)]
pub struct LanguageModel {
    create_options: Arc<CreateOptions>,
    max_temperature: f32,
    max_top_k: u32,
    default_temperature: f32,
    default_top_k: u32,
    backend: Arc<dyn LanguageModelBackend>,
}

impl LanguageModel {
    pub(crate) fn new(create_options: CreateOptions, backend: Arc<dyn LanguageModelBackend>) -> Self {
        let caps = *backend.capabilities();
        Self {
            create_options: Arc::new(create_options),
            max_temperature: caps.max_temperature,
            max_top_k: caps.max_top_k,
            default_temperature: caps.default_temperature,
            default_top_k: caps.default_top_k,
            backend,
        }
    }

    pub fn create_options(&self) -> &CreateOptions {
        &self.create_options
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn max_temperature(&self) -> f32 {
        self.max_temperature
    }

    pub fn max_top_k(&self) -> u32 {
        self.max_top_k
    }

    pub fn default_temperature(&self) -> f32 {
        self.default_temperature
    }

    pub fn default_top_k(&self) -> u32 {
        self.default_top_k
    }

    /// The limits copied from the backend at creation.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new(
            self.max_temperature,
            self.max_top_k,
            self.default_temperature,
            self.default_top_k,
        )
    }

    /// Generate a complete response to the conversation.
    pub async fn prompt(&self, input: impl Into<ConversationInput>) -> Result<String> {
        let inputs = normalize(&input.into());
        debug!(backend = %self.backend_kind(), inputs = inputs.len(), "prompt");
        self.backend.prompt(&self.create_options, &inputs).await
    }

    /// Generate a response delivered as text chunks.
    pub async fn prompt_streaming(&self, input: impl Into<ConversationInput>) -> Result<TextStream> {
        let inputs = normalize(&input.into());
        debug!(backend = %self.backend_kind(), inputs = inputs.len(), "prompt_streaming");
        self.backend
            .prompt_streaming(&self.create_options, &inputs)
            .await
    }

    /// Count the tokens the conversation would use.
    pub async fn count_tokens(&self, input: impl Into<ConversationInput>) -> Result<u64> {
        let inputs = normalize(&input.into());
        debug!(backend = %self.backend_kind(), inputs = inputs.len(), "count_tokens");
        self.backend.count_tokens(&self.create_options, &inputs).await
    }
}

impl std::fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModel")
            .field("backend", &self.backend_kind())
            .field("create_options", &self.create_options)
            .field("max_temperature", &self.max_temperature)
            .field("max_top_k", &self.max_top_k)
            .finish()
    }
}
