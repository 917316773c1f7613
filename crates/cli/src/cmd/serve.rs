//! Proxy server command.

use crate::config::Config;
use anyhow::Result;
use clap::Args;

/// Start the proxy server.
#[derive(Args, Debug)]
pub struct Serve {
    /// Bind address (host:port). Defaults to the `[server]` config.
    #[arg(long)]
    pub bind: Option<std::net::SocketAddr>,
}

impl Serve {
    /// Serve until ctrl-c.
    pub async fn run(self, config: &Config) -> Result<()> {
        let bind = self
            .bind
            .map(|a| a.to_string())
            .unwrap_or_else(|| config.gateway.server.bind.clone());

        let handle = gateway::serve(&config.gateway, &bind).await?;

        tokio::signal::ctrl_c().await?;
        tracing::info!("received ctrl-c, shutting down");
        handle.shutdown().await?;
        tracing::info!("gateway shut down");
        Ok(())
    }
}
