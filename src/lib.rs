pub mod canvas;
pub mod config;
pub mod error;
pub mod hub;
pub mod viewer;
pub mod websocket;

use axum::{http::Method, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use config::WS_PATH;
use error::PixelboardError;
use hub::Hub;

/// Application state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<RwLock<Hub>>,
}

impl AppState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            hub: Arc::new(RwLock::new(Hub::new(width, height))),
        }
    }
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Build the HTTP surface: WebSocket endpoint, health check, static viewer
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .route(WS_PATH, get(websocket::handler::ws_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

/// Serve the router on an already bound listener until the process exits
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    static_dir: impl AsRef<Path>,
) -> Result<(), PixelboardError> {
    axum::serve(listener, router(state, static_dir)).await?;
    Ok(())
}
