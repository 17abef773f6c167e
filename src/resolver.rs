//! Backend selection and effective option defaults.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{LanguageModelError, Result};
use crate::events::{emit, EventSink, ModelEvent};
use crate::normalize::normalize_prompts;
use crate::provider::{BackendKind, LocalModelHost, RemoteTransport};
use crate::types::{Capabilities, CreateOptions, ModelOptions};

/// Outcome of backend resolution.
pub enum BackendSelection {
    /// The local host reported `available`; it supplies its own limits.
    Local(Arc<dyn LocalModelHost>),
    /// The remote peer, with the capabilities it declared.
    Remote(Capabilities),
}

impl BackendSelection {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local(_) => BackendKind::Local,
            Self::Remote(_) => BackendKind::Remote,
        }
    }

    /// Remote capabilities; `None` for a local selection.
    pub fn capabilities(&self) -> Option<&Capabilities> {
        match self {
            Self::Local(_) => None,
            Self::Remote(caps) => Some(caps),
        }
    }
}

impl std::fmt::Debug for BackendSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(_) => f.write_str("Local"),
            Self::Remote(caps) => f.debug_tuple("Remote").field(caps).finish(),
        }
    }
}

/// Decides between the local host and the remote peer.
#[derive(Clone)]
pub struct CapabilityResolver {
    transport: Arc<RemoteTransport>,
    local: Option<Arc<dyn LocalModelHost>>,
    event_sink: Option<EventSink>,
}

impl CapabilityResolver {
    pub fn new(transport: Arc<RemoteTransport>) -> Self {
        Self {
            transport,
            local: None,
            event_sink: None,
        }
    }

    pub fn with_local_host(mut self, host: Arc<dyn LocalModelHost>) -> Self {
        self.local = Some(host);
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn transport(&self) -> &Arc<RemoteTransport> {
        &self.transport
    }

    pub(crate) fn event_sink(&self) -> Option<&EventSink> {
        self.event_sink.as_ref()
    }

    /// Pick a backend.
    ///
    /// With `force_fallback` the local host is never consulted. A local probe
    /// that fails or reports anything but `available` falls through to the
    /// remote peer, whose capability query failing is a construction error.
    pub async fn resolve(&self, force_fallback: bool) -> Result<BackendSelection> {
        if !force_fallback {
            if let Some(host) = self.probe_local().await {
                return Ok(BackendSelection::Local(host));
            }
        } else {
            debug!("local backend skipped: fallback forced");
        }
        self.resolve_remote().await.map(BackendSelection::Remote)
    }

    /// Fetch the remote peer's capabilities.
    pub async fn resolve_remote(&self) -> Result<Capabilities> {
        let capabilities = self
            .transport
            .fetch_capabilities()
            .await
            .map_err(LanguageModelError::construction)?;
        info!(
            max_temperature = capabilities.max_temperature,
            max_top_k = capabilities.max_top_k,
            "remote capabilities resolved"
        );
        Ok(capabilities)
    }

    /// Report a failure to bring up the local backend and continue remotely.
    pub(crate) fn local_failed(&self, err: &LanguageModelError) {
        warn!(error = %err, "local backend unusable, falling back to remote");
        emit(
            self.event_sink(),
            ModelEvent::LocalProbeFailed {
                reason: err.to_string(),
            },
        );
    }

    async fn probe_local(&self) -> Option<Arc<dyn LocalModelHost>> {
        let host = self.local.as_ref().filter(|host| host.is_present())?;

        match host.availability().await {
            Ok(availability) => {
                debug!(%availability, "local backend probed");
                emit(
                    self.event_sink(),
                    ModelEvent::LocalProbed {
                        availability: availability.clone(),
                    },
                );
                if availability.is_available() {
                    Some(host.clone())
                } else {
                    warn!(%availability, "local backend not readily available");
                    None
                }
            }
            Err(e) => {
                let err = match e {
                    err @ LanguageModelError::CapabilityProbe(_) => err,
                    other => LanguageModelError::CapabilityProbe(other.to_string()),
                };
                self.local_failed(&err);
                None
            }
        }
    }
}

impl std::fmt::Debug for CapabilityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityResolver")
            .field("transport", &self.transport)
            .field("local", &self.local.as_ref().map(|_| ".."))
            .field("event_sink", &self.event_sink.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Fill unset sampling parameters from `capabilities` and validate the result.
///
/// Presence is explicit: `Some(0.0)` is kept, only `None` takes the default.
pub fn resolve_create_options(
    options: &ModelOptions,
    capabilities: &Capabilities,
) -> Result<CreateOptions> {
    let resolved = CreateOptions {
        temperature: options
            .temperature
            .unwrap_or(capabilities.default_temperature),
        top_k: options.top_k.unwrap_or(capabilities.default_top_k),
        system_prompt: options.system_prompt.clone(),
        expected_inputs: options.expected_inputs.clone(),
        initial_prompts: normalize_prompts(&options.initial_prompts),
    };
    resolved.validate(capabilities)?;
    Ok(resolved)
}
