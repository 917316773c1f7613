//! Serve entrypoint shared by the CLI and the tests.

use crate::{GatewayConfig, router, state::Gateway};
use anyhow::Result;
use mcore::DegradedResponsePolicy;
use tokio::sync::oneshot;

/// Handle returned by [`serve`]: the bound port and a shutdown trigger.
pub struct ServeHandle {
    /// The port the proxy is listening on.
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Build the state from `config` and start serving on `bind`.
///
/// The server runs in a spawned task; call [`ServeHandle::shutdown`] to
/// stop it.
pub async fn serve(config: &GatewayConfig, bind: &str) -> Result<ServeHandle> {
    tracing::info!(
        "relaying to backend {} and LLM gateway {}",
        config.upstream.backend_url,
        config.upstream.llm_gateway_url
    );
    serve_with_state(Gateway::new(config)?, bind).await
}

/// Serve an already-built state.
pub async fn serve_with_state<P: DegradedResponsePolicy + 'static>(
    state: Gateway<P>,
    bind: &str,
) -> Result<ServeHandle> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("gateway listening on {bind} (port {port})");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
