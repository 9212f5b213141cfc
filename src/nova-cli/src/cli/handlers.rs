//! Command dispatch and shared setup.

use anyhow::{Context, Result};
use nova_client::NovaClient;
use nova_core::{ChatBackend, Conversation, RevealEngine, RevealEvents};

use super::args::{Cli, Commands, GlobalArgs};
use crate::chat_cmd::run_chat;
use crate::config::NovaConfig;
use crate::health_cmd::run_health;

/// Dispatch a CLI command to its handler.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let Cli { global, command } = cli;
    match command {
        // Extraction is offline and ignores the config file.
        Some(Commands::Extract(extract_cli)) => extract_cli.run().await,
        None | Some(Commands::Chat) => run_chat(&resolve_config(&global)?).await,
        Some(Commands::Ask(ask_cli)) => ask_cli.run(&resolve_config(&global)?).await,
        Some(Commands::Health) => run_health(&resolve_config(&global)?).await,
    }
}

/// Loads the config file and applies command-line overrides.
pub fn resolve_config(global: &GlobalArgs) -> Result<NovaConfig> {
    let mut config =
        NovaConfig::load(global.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = &global.api_url {
        config.api_url = url.clone();
    }
    if global.no_animate {
        config.reveal.animate = false;
    }
    tracing::debug!(api_url = %config.api_url, animate = config.reveal.animate, "resolved config");
    Ok(config)
}

/// Creates the HTTP client for the configured server.
pub fn build_client(config: &NovaConfig) -> Result<NovaClient> {
    NovaClient::with_timeout(config.api_url.clone(), config.request_timeout())
        .context("Failed to create HTTP client")
}

/// Creates a conversation paced by the configured tick interval.
pub fn build_conversation<B: ChatBackend>(
    backend: B,
    config: &NovaConfig,
    animate: bool,
) -> (Conversation<B>, RevealEvents) {
    let engine = RevealEngine::new().with_tick_interval(config.tick_interval());
    let (conversation, events) = Conversation::new(backend, engine);
    (conversation.with_animation(animate), events)
}
