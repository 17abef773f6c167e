//! HTTP transport to the remote language model peer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::{CapabilitiesMethod, HybridConfig};
use crate::error::{LanguageModelError, Result};
use crate::stream::TextStream;
use crate::types::{Capabilities, CreateOptions, Message};

use super::http::{build_client, check_response, request_error};
use super::{BackendKind, LanguageModelBackend};

pub const CAPABILITIES_PATH: &str = "/language-model/capabilities";
pub const PROMPT_PATH: &str = "/language-model/prompt";
pub const PROMPT_STREAMING_PATH: &str = "/language-model/prompt-streaming";
pub const COUNT_TOKENS_PATH: &str = "/language-model/count-tokens";

/// Request envelope shared by the three generation endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptRequest<'a> {
    create_options: &'a CreateOptions,
    inputs: &'a [Message],
}

/// Issues requests against the peer's `/language-model` endpoints.
///
/// Nothing is retried here: generation calls are not safe to repeat.
///
/// Buffered calls (capabilities, `prompt`, `count_tokens`) are bounded as a
/// whole by the configured timeout. A streamed body is not: it runs until the
/// peer closes it, with only each read bounded by the client.
#[derive(Debug, Clone)]
pub struct RemoteTransport {
    client: reqwest::Client,
    base_url: String,
    capabilities_method: CapabilitiesMethod,
    timeout: Duration,
}

impl RemoteTransport {
    pub fn new(config: &HybridConfig) -> Result<Self> {
        Ok(Self::with_client(build_client(config)?, config))
    }

    /// Use a caller-provided client; URL, method and the buffered-call deadline
    /// are taken from `config`.
    pub fn with_client(client: reqwest::Client, config: &HybridConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            capabilities_method: config.capabilities_method,
            timeout: config.request_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Query the peer's declared sampling limits.
    pub async fn fetch_capabilities(&self) -> Result<Capabilities> {
        let url = self.url(CAPABILITIES_PATH);
        debug!(method = %self.capabilities_method, path = CAPABILITIES_PATH, "capability query");

        let request = match self.capabilities_method {
            CapabilitiesMethod::Get => self.client.get(&url),
            CapabilitiesMethod::Post => self.client.post(&url),
        };
        let resp = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout_ms()))?;
        let resp = check_response(resp).await?;

        let body = resp
            .bytes()
            .await
            .map_err(|e| request_error(e, self.timeout_ms()))?;
        let capabilities: Capabilities = serde_json::from_slice(&body)?;
        capabilities.validate()?;
        Ok(capabilities)
    }

    /// `POST /language-model/prompt`, returning the whole body as text.
    pub async fn prompt(&self, options: &CreateOptions, inputs: &[Message]) -> Result<String> {
        let resp = self
            .post(PROMPT_PATH, options, inputs, Some(self.timeout))
            .await?;
        resp.text()
            .await
            .map_err(|e| request_error(e, self.timeout_ms()))
    }

    /// `POST /language-model/prompt-streaming`, returning the body as a text stream.
    pub async fn prompt_streaming(
        &self,
        options: &CreateOptions,
        inputs: &[Message],
    ) -> Result<TextStream> {
        let resp = self
            .post(PROMPT_STREAMING_PATH, options, inputs, None)
            .await?;
        Ok(TextStream::new(resp.bytes_stream()))
    }

    /// `POST /language-model/count-tokens`, parsing a decimal count.
    pub async fn count_tokens(&self, options: &CreateOptions, inputs: &[Message]) -> Result<u64> {
        let resp = self
            .post(COUNT_TOKENS_PATH, options, inputs, Some(self.timeout))
            .await?;
        let body = resp
            .text()
            .await
            .map_err(|e| request_error(e, self.timeout_ms()))?;
        body.trim().parse::<u64>().map_err(|_| {
            LanguageModelError::Decode(format!("token count is not an integer: '{}'", body.trim()))
        })
    }

    async fn post(
        &self,
        path: &'static str,
        options: &CreateOptions,
        inputs: &[Message],
        deadline: Option<Duration>,
    ) -> Result<reqwest::Response> {
        debug!(path, inputs = inputs.len(), "remote request");

        let body = PromptRequest {
            create_options: options,
            inputs,
        };
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout_ms()))?;
        check_response(resp).await
    }
}

/// Remote peer as a facade backend, with the capabilities it declared.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    transport: Arc<RemoteTransport>,
    capabilities: Capabilities,
}

impl RemoteBackend {
    pub fn new(transport: Arc<RemoteTransport>, capabilities: Capabilities) -> Self {
        Self {
            transport,
            capabilities,
        }
    }
}

#[async_trait]
impl LanguageModelBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn prompt(&self, options: &CreateOptions, inputs: &[Message]) -> Result<String> {
        self.transport.prompt(options, inputs).await
    }

    async fn prompt_streaming(
        &self,
        options: &CreateOptions,
        inputs: &[Message],
    ) -> Result<TextStream> {
        self.transport.prompt_streaming(options, inputs).await
    }

    async fn count_tokens(&self, options: &CreateOptions, inputs: &[Message]) -> Result<u64> {
        self.transport.count_tokens(options, inputs).await
    }
}
