//! Integration tests for the HTTP API endpoints.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt), no TCP binding needed.
//! Distribution requests pass a small `simulationCount` to stay fast.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gacha::env_config::SimulationConfig;
use gacha::server::{create_router, AppState};

// Shared state (built once per test binary). Each test gets its own Router
// but reuses the solved tables.
static STATE: std::sync::OnceLock<Arc<AppState>> = std::sync::OnceLock::new();

fn get_state() -> Arc<AppState> {
    STATE
        .get_or_init(|| {
            Arc::new(AppState::new(SimulationConfig {
                seed: 12345,
                buffer_size: 8192,
                trials_per_chunk: 512,
                simulation_count: Some(5_000),
            }))
        })
        .clone()
}

fn app() -> axum::Router {
    create_router(get_state())
}

/// Parse response body as JSON.
async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_calculate(body: &str) -> (StatusCode, serde_json::Value) {
    let resp = app()
        .oneshot(
            Request::post("/calculate")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp.into_body()).await)
}

// ── GET /health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200() {
    let resp = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["status"], "OK");
}

// ── POST /calculate: expectation ─────────────────────────────────────

#[tokio::test]
async fn expectation_hsr_character() {
    let (status, json) =
        post_calculate(r#"{"game":"hsr","pool":"character","initialState":{"pity":0}}"#).await;
    assert_eq!(status, StatusCode::OK);
    let mean = json["mean"].as_f64().unwrap();
    assert!((mean - 89.5524).abs() < 1e-3, "mean={mean}");
    assert_eq!(json.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn expectation_guaranteed_is_cheaper() {
    let (_, plain) =
        post_calculate(r#"{"game":"genshin","pool":"character","initialState":{"pity":30}}"#).await;
    let (_, guaranteed) = post_calculate(
        r#"{"game":"genshin","pool":"character","initialState":{"pity":30,"isGuaranteed":true}}"#,
    )
    .await;
    assert!(guaranteed["mean"].as_f64().unwrap() < plain["mean"].as_f64().unwrap());
}

#[tokio::test]
async fn expectation_multi_target_weapon() {
    let (status, json) = post_calculate(
        r#"{"game":"genshin","pool":"weapon","initialState":{"pity":0,"fatePoint":1},"targetCount":2}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mean = json["mean"].as_f64().unwrap();
    // One guaranteed cycle plus one fresh search.
    assert!((mean - (53.8776 + 87.5512)).abs() < 1e-3, "mean={mean}");
}

// ── POST /calculate: distribution ────────────────────────────────────

#[tokio::test]
async fn distribution_genshin_character_has_returns() {
    let (status, json) = post_calculate(
        r#"{"game":"genshin","pool":"character","mode":"distribution",
            "initialState":{"pity":0},"targetCount":2,"budget":150,"up4C6":true}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pulls = &json["pulls"];
    for key in ["p25", "p50", "p75", "p90", "p95"] {
        assert!(pulls[key].is_u64(), "{key} should be an integer: {}", pulls[key]);
    }
    assert!(pulls["p25"].as_u64() <= pulls["p95"].as_u64());
    let rate = json["success_rate"].as_f64().unwrap();
    assert!(rate > 0.0 && rate < 100.0, "rate={rate}");
    assert!(json["returns"]["mean"].as_f64().unwrap() > 0.0);
    assert!(json["returns"]["p50"].is_f64());
}

#[tokio::test]
async fn distribution_deterministic_with_seed() {
    let body = r#"{"game":"hsr","pool":"lightcone","mode":"distribution",
                   "initialState":{"pity":10},"simulationCount":1000,"seed":77}"#;
    let (_, a) = post_calculate(body).await;
    let (_, b) = post_calculate(body).await;
    assert_eq!(a, b);
    assert!(a.get("returns").is_none());
    assert!(a.get("success_rate").is_none());
}

// ── Errors ───────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_pool_combination_returns_400() {
    let (status, json) =
        post_calculate(r#"{"game":"hsr","pool":"weapon","initialState":{"pity":0}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("configuration"));
}

#[tokio::test]
async fn pity_out_of_range_returns_400() {
    let (status, json) =
        post_calculate(r#"{"game":"genshin","pool":"character","initialState":{"pity":95}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn malformed_body_returns_400() {
    let (status, json) = post_calculate("{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn zero_targets_returns_400() {
    let (status, _) = post_calculate(
        r#"{"game":"hsr","pool":"character","initialState":{"pity":0},"targetCount":0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
