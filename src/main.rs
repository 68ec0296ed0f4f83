use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixelboard_rs::config::{Config, WS_PATH};
use pixelboard_rs::error::PixelboardError;
use pixelboard_rs::AppState;

#[tokio::main]
async fn main() -> Result<(), PixelboardError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelboard=info,pixelboard_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // The hub's dimensions are the only ones; viewers size themselves from the snapshot
    let state = AppState::new(config.canvas_width, config.canvas_height);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("🎨 Pixelboard server running on http://{}", addr);
    tracing::info!("   WebSocket endpoint: ws://{}{}", addr, WS_PATH);
    tracing::info!(
        "   Canvas size: {}x{}",
        config.canvas_width,
        config.canvas_height
    );

    pixelboard_rs::serve(listener, state, &config.static_dir).await
}
