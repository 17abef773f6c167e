//! hybrid-lm CLI binary entry point.

use clap::Parser;
use hybrid_lm::cli::{commands, Cli, Commands};
use hybrid_lm::config::HybridConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match HybridConfig::load() {
        Ok(config) => {
            let config = cli.apply(config);
            match cli.command {
                Commands::Prompt(args) => commands::handle_prompt(&config, args).await,
                Commands::CountTokens(args) => commands::handle_count_tokens(&config, args).await,
                Commands::Capabilities => commands::handle_capabilities(&config).await,
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
