//! Asynchronous construction of [`LanguageModel`] facades.

use std::sync::Arc;

use tracing::info;

use crate::config::HybridConfig;
use crate::error::Result;
use crate::events::{emit, EventSink, ModelEvent};
use crate::provider::{LocalModelHost, RemoteBackend, RemoteTransport};
use crate::resolver::{resolve_create_options, BackendSelection, CapabilityResolver};
use crate::types::{Capabilities, ModelOptions};

use super::LanguageModel;

/// Builds facades, choosing the local host when it is available and the
/// remote peer otherwise.
///
/// ```no_run
/// use hybrid_lm::config::HybridConfig;
/// use hybrid_lm::model::ModelFactory;
/// use hybrid_lm::types::ModelOptions;
///
/// # async fn example() -> hybrid_lm::error::Result<()> {
/// let factory = ModelFactory::new(&HybridConfig::load()?)?;
/// let model = factory.create(ModelOptions::default()).await?;
/// let reply = model.prompt("Hello").await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ModelFactory {
    resolver: CapabilityResolver,
    force_fallback: bool,
}

impl ModelFactory {
    pub fn new(config: &HybridConfig) -> Result<Self> {
        let transport = Arc::new(RemoteTransport::new(config)?);
        Ok(Self::from_resolver(
            CapabilityResolver::new(transport),
            config.force_fallback,
        ))
    }

    pub fn from_resolver(resolver: CapabilityResolver, force_fallback: bool) -> Self {
        Self {
            resolver,
            force_fallback,
        }
    }

    pub fn with_local_host(mut self, host: Arc<dyn LocalModelHost>) -> Self {
        self.resolver = self.resolver.with_local_host(host);
        self
    }

    /// Register an observer for resolution events.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.resolver = self.resolver.with_event_sink(sink);
        self
    }

    /// Create a facade using the configured fallback setting.
    pub async fn create(&self, options: ModelOptions) -> Result<LanguageModel> {
        self.create_with_fallback(options, self.force_fallback).await
    }

    /// Create a facade. No facade is returned unless resolution succeeds.
    ///
    /// Only a failure of the local host's `create` falls back to the remote
    /// peer. Caller options outside the selected backend's limits fail with
    /// `InvalidArgument`.
    pub async fn create_with_fallback(
        &self,
        options: ModelOptions,
        force_fallback: bool,
    ) -> Result<LanguageModel> {
        let model = match self.resolver.resolve(force_fallback).await? {
            BackendSelection::Local(host) => match host.create(&options).await {
                Ok(backend) => {
                    // Caller options out of the local limits are the caller's error.
                    let create_options = resolve_create_options(&options, backend.capabilities())?;
                    LanguageModel::new(create_options, backend)
                }
                Err(e) => {
                    self.resolver.local_failed(&e);
                    let capabilities = self.resolver.resolve_remote().await?;
                    self.create_remote(&options, capabilities)?
                }
            },
            BackendSelection::Remote(capabilities) => self.create_remote(&options, capabilities)?,
        };

        info!(
            backend = %model.backend_kind(),
            temperature = model.create_options().temperature,
            top_k = model.create_options().top_k,
            "language model ready"
        );
        emit(
            self.resolver.event_sink(),
            ModelEvent::BackendSelected {
                kind: model.backend_kind(),
            },
        );
        Ok(model)
    }

    fn create_remote(&self, options: &ModelOptions, capabilities: Capabilities) -> Result<LanguageModel> {
        let create_options = resolve_create_options(options, &capabilities)?;
        let backend = Arc::new(RemoteBackend::new(
            self.resolver.transport().clone(),
            capabilities,
        ));
        Ok(LanguageModel::new(create_options, backend))
    }
}
