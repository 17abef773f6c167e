//! CLI entry point for hybrid-lm.

pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::config::HybridConfig;
use crate::types::ModelOptions;

/// hybrid-lm CLI
#[derive(Parser, Debug)]
#[command(name = "hybrid-lm", version, about = "Talk to a language model peer")]
pub struct Cli {
    /// Base URL of the remote peer (overrides HYBRID_LM_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Never probe a local backend
    #[arg(long, global = true)]
    pub force_fallback: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a prompt and print the reply
    Prompt(PromptArgs),
    /// Count the tokens of a prompt
    CountTokens(ModelArgs),
    /// Show the peer's declared capabilities
    Capabilities,
}

/// Options shared by every command that creates a model.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Top-K sampling
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// User prompt (positional)
    pub prompt: String,
}

impl ModelArgs {
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            temperature: self.temperature,
            top_k: self.top_k,
            system_prompt: self.system.clone(),
            ..Default::default()
        }
    }
}

/// Arguments for the `prompt` subcommand.
#[derive(Args, Debug)]
pub struct PromptArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Print chunks as they arrive
    #[arg(long)]
    pub stream: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, mut config: HybridConfig) -> HybridConfig {
        if let Some(ref url) = self.base_url {
            config = config.with_base_url(url.clone());
        }
        if self.force_fallback {
            config = config.with_force_fallback(true);
        }
        config
    }
}
