//! Prediction HTTP server
//!
//! Thin serving shell over the packaged pipeline: the artifact is loaded once
//! at startup, wrapped in an `Arc`, and injected into the handlers. It is
//! never mutated afterwards, so concurrent requests share it without
//! synchronization.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use crate::artifact::PricePipeline;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifact_path: PathBuf,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, artifact_path: PathBuf) -> Self {
        Self {
            host: host.into(),
            port,
            artifact_path,
        }
    }
}

/// Load the artifact and serve until ctrl-c.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let pipeline = PricePipeline::load(&config.artifact_path)?;
    let state = Arc::new(AppState::new(pipeline));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        artifact = %config.artifact_path.display(),
        "prediction server listening"
    );

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        info!("shutdown signal received, stopping server");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("server shut down cleanly");
    Ok(())
}
