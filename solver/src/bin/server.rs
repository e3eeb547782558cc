use std::sync::Arc;

use log::{error, info};

use gacha::env_config::{init_logging, init_rayon_threads_lenient, server_port, SimulationConfig};
use gacha::server::{create_router, AppState};

#[tokio::main]
async fn main() {
    init_logging();
    let port = server_port();
    init_rayon_threads_lenient();
    info!("starting gacha API server...");

    let state = Arc::new(AppState::new(SimulationConfig::from_env()));
    if let Err(e) = state.cache.warm_all() {
        error!("failed to solve pool tables: {}", e);
        std::process::exit(1);
    }
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };
    info!("server is running on port {}. Press Ctrl+C to stop.", port);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {}", e);
    }

    info!("stopping server...");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install CTRL+C signal handler: {}", e);
    }
}
