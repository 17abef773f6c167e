//! CLI command handlers.

use std::io::Write;

use futures::StreamExt;

use crate::config::HybridConfig;
use crate::error::Result;
use crate::model::ModelFactory;
use crate::provider::RemoteTransport;

use super::{ModelArgs, PromptArgs};

/// Handle `hybrid-lm prompt`.
pub async fn handle_prompt(config: &HybridConfig, args: PromptArgs) -> Result<()> {
    let factory = ModelFactory::new(config)?;
    let model = factory.create(args.model.model_options()).await?;

    if !args.stream {
        let reply = model.prompt(args.model.prompt).await?;
        println!("{reply}");
        return Ok(());
    }

    let mut stream = model.prompt_streaming(args.model.prompt).await?;
    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        write!(stdout, "{}", chunk?)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Handle `hybrid-lm count-tokens`.
pub async fn handle_count_tokens(config: &HybridConfig, args: ModelArgs) -> Result<()> {
    let factory = ModelFactory::new(config)?;
    let model = factory.create(args.model_options()).await?;
    let count = model.count_tokens(args.prompt).await?;
    println!("{count}");
    Ok(())
}

/// Handle `hybrid-lm capabilities`.
pub async fn handle_capabilities(config: &HybridConfig) -> Result<()> {
    let transport = RemoteTransport::new(config)?;
    let capabilities = transport.fetch_capabilities().await?;
    println!("{}", serde_json::to_string_pretty(&capabilities)?);
    Ok(())
}
