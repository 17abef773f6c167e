//! Shared test helpers: fake local host, echo backend, tracked byte streams.

#![allow(dead_code)]

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hybrid_lm::config::HybridConfig;
use hybrid_lm::error::{LanguageModelError, Result};
use hybrid_lm::provider::{Availability, BackendKind, LanguageModelBackend, LocalModelHost};
use hybrid_lm::stream::TextStream;
use hybrid_lm::types::{Capabilities, CreateOptions, Message, ModelOptions};

pub const LOCAL_CAPS: Capabilities = Capabilities::new(1.0, 40, 0.7, 5);

pub fn peer_capabilities() -> serde_json::Value {
    json!({
        "maxTemperature": 2.0,
        "maxTopK": 8,
        "defaultTemperature": 1.0,
        "defaultTopK": 3
    })
}

/// Mount a capability endpoint answering with [`peer_capabilities`].
pub async fn mount_capabilities(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/language-model/capabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(peer_capabilities()))
        .mount(server)
        .await;
}

pub fn config_for(server: &MockServer) -> HybridConfig {
    HybridConfig::default().with_base_url(server.uri())
}

/// What the fake host answers to an availability query.
#[derive(Debug, Clone)]
pub enum Probe {
    Status(Availability),
    Fail(String),
}

/// A host-provided model whose behaviour is scripted by the test.
pub struct FakeLocalHost {
    pub present: bool,
    pub probe: Probe,
    pub fail_create: bool,
    pub probes: AtomicUsize,
    pub creates: AtomicUsize,
    pub backend: Arc<EchoBackend>,
}

impl FakeLocalHost {
    pub fn with_status(status: &str) -> Self {
        Self {
            present: true,
            probe: Probe::Status(Availability::from(status)),
            fail_create: false,
            probes: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            backend: Arc::new(EchoBackend::new(BackendKind::Local, LOCAL_CAPS)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            probe: Probe::Fail(reason.to_string()),
            ..Self::with_status("available")
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalModelHost for FakeLocalHost {
    fn is_present(&self) -> bool {
        self.present
    }

    async fn availability(&self) -> Result<Availability> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match &self.probe {
            Probe::Status(status) => Ok(status.clone()),
            Probe::Fail(reason) => Err(LanguageModelError::CapabilityProbe(reason.clone())),
        }
    }

    async fn create(&self, _options: &ModelOptions) -> Result<Arc<dyn LanguageModelBackend>> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(LanguageModelError::InvalidArgument(
                "local session refused".into(),
            ));
        }
        Ok(self.backend.clone())
    }
}

/// Deterministic backend: replies `echo: <last content>`.
pub struct EchoBackend {
    kind: BackendKind,
    capabilities: Capabilities,
    pub seen: Mutex<Vec<(CreateOptions, Vec<Message>)>>,
}

impl EchoBackend {
    pub fn new(kind: BackendKind, capabilities: Capabilities) -> Self {
        Self {
            kind,
            capabilities,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn reply(&self, options: &CreateOptions, inputs: &[Message]) -> String {
        self.seen
            .lock()
            .unwrap()
            .push((options.clone(), inputs.to_vec()));
        let last = inputs.last().map(|m| m.content.as_str()).unwrap_or("");
        format!("echo: {last}")
    }
}

#[async_trait]
impl LanguageModelBackend for EchoBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn prompt(&self, options: &CreateOptions, inputs: &[Message]) -> Result<String> {
        Ok(self.reply(options, inputs))
    }

    async fn prompt_streaming(
        &self,
        options: &CreateOptions,
        inputs: &[Message],
    ) -> Result<TextStream> {
        let bytes = self.reply(options, inputs).into_bytes();
        let chunks: Vec<std::io::Result<Bytes>> = bytes
            .chunks(3)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(TextStream::new(futures::stream::iter(chunks)))
    }

    async fn count_tokens(&self, options: &CreateOptions, inputs: &[Message]) -> Result<u64> {
        self.reply(options, inputs);
        Ok(inputs
            .iter()
            .map(|m| m.content.split_whitespace().count() as u64)
            .sum())
    }
}

/// Byte stream that flips `released` when dropped.
pub struct TrackedStream<S> {
    inner: S,
    released: Arc<AtomicBool>,
}

impl<S> Drop for TrackedStream<S> {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl<S> Stream for TrackedStream<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

/// A text stream over `chunks` whose source never closes on its own.
pub fn open_ended_stream(chunks: Vec<&'static [u8]>) -> (TextStream, Arc<AtomicBool>) {
    let released = Arc::new(AtomicBool::new(false));
    let inner = futures::stream::iter(
        chunks
            .into_iter()
            .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c))),
    )
    .chain(futures::stream::pending());
    let tracked = TrackedStream {
        inner,
        released: released.clone(),
    };
    (TextStream::new(tracked), released)
}

/// A text stream over scripted results that closes after the last one.
pub fn scripted_stream(
    items: Vec<std::io::Result<Bytes>>,
) -> (TextStream, Arc<AtomicBool>) {
    let released = Arc::new(AtomicBool::new(false));
    let tracked = TrackedStream {
        inner: futures::stream::iter(items),
        released: released.clone(),
    };
    (TextStream::new(tracked), released)
}
