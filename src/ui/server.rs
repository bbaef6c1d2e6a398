//! HTTP server for the status API

use axum::{
    routing::{get, post},
    Router,
};
use crossbeam_channel::Sender;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::config::UiConfig;
use crate::protocol::{ControlMessage, SharedStatus};
use crate::ui::handlers;

/// State shared by all handlers
pub struct AppState {
    /// Latest snapshot published by the tick loop
    pub status: SharedStatus,
    /// Commands for the tick loop
    pub control_tx: Sender<ControlMessage>,
}

/// Status API server
pub struct WebServer {
    config: UiConfig,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(config: UiConfig, status: SharedStatus, control_tx: Sender<ControlMessage>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { status, control_tx }),
        }
    }

    /// Build the API router
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind and serve until the task is aborted
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.http_port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Status API listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Serve on a background task
    pub fn start_background(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                tracing::error!("Status API failed: {}", e);
            }
        })
    }
}

/// Routes over an existing state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(handlers::get_status))
        .route("/api/frame", get(handlers::get_frame))
        .route("/api/landmarks", get(handlers::get_landmarks))
        .route("/api/reset", post(handlers::reset))
        .route("/api/smoothing", post(handlers::set_smoothing))
        .route("/api/depth", post(handlers::set_depth))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
