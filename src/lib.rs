//! hybrid-lm — one language model interface over a local host model or a
//! remote HTTP peer.
//!
//! A [`model::ModelFactory`] probes the injected local host first and falls
//! back to the peer's `/language-model` endpoints. Callers then use the
//! returned [`model::LanguageModel`] without knowing which backend answers.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use hybrid_lm::prelude::*;
//!
//! # async fn example() -> hybrid_lm::error::Result<()> {
//! let factory = ModelFactory::new(&HybridConfig::load()?)?;
//! let model = factory.create(ModelOptions::default()).await?;
//!
//! let mut stream = model.prompt_streaming("Tell me a story").await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod normalize;
pub mod prelude;
pub mod provider;
pub mod resolver;
pub mod stream;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
