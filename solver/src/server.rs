//! Axum HTTP server exposing the calculator.
//!
//! Every request goes through the same [`compute`] dispatch as `gacha-calc`.
//! All handlers share one [`SolverCache`] behind `Arc`, so each pool's tables
//! are solved at most once per process.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/calculate` | Expectation or distribution for one request |

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use log::{error, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::api_computations::{compute, parse_request, Response};
use crate::cache::SolverCache;
use crate::env_config::SimulationConfig;
use crate::error::GachaError;
use crate::types::Mode;

pub struct AppState {
    pub cache: SolverCache,
    pub config: SimulationConfig,
}

impl AppState {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            cache: SolverCache::new(),
            config,
        }
    }
}

pub type SharedState = Arc<AppState>;

pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/calculate", post(handle_calculate))
        .layer(cors)
        .with_state(state)
}

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(err: &GachaError) -> ErrorResponse {
    let status = if err.is_client_error() {
        warn!("rejected request: {}", err);
        StatusCode::BAD_REQUEST
    } else {
        error!("calculation failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

/// The body is taken raw so that malformed JSON gets the same error shape as
/// every other rejection.
async fn handle_calculate(
    State(state): State<SharedState>,
    body: String,
) -> Result<Json<Response>, ErrorResponse> {
    let req = parse_request(&body).map_err(|e| error_response(&e))?;

    let result = match req.mode {
        Mode::Expectation => compute(&state.cache, &state.config, &req),
        Mode::Distribution => {
            let state = Arc::clone(&state);
            tokio::task::spawn_blocking(move || compute(&state.cache, &state.config, &req))
                .await
                .unwrap_or_else(|e| Err(GachaError::Numerical(format!("simulation task failed: {e}"))))
        }
    };

    result.map(Json).map_err(|e| error_response(&e))
}
