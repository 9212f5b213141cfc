//! Server health command.

use anyhow::{Context, Result};

use crate::cli::handlers::build_client;
use crate::config::NovaConfig;

/// Prints the served model and, when available, its generation settings.
pub async fn run_health(config: &NovaConfig) -> Result<()> {
    let client = build_client(config)?;
    let health = client
        .health()
        .await
        .with_context(|| format!("Nova server at {} is not healthy", client.base_url()))?;

    println!("Server:      {}", client.base_url());
    println!("Model:       {}", health.model);

    match client.config().await {
        Ok(server) => {
            println!("Temperature: {}", server.temperature);
            println!("Max tokens:  {}", server.max_tokens);
        }
        Err(err) => tracing::debug!("Could not fetch server config: {}", err),
    }
    Ok(())
}
