// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`:
//
//   GET  /api/v1/health    public   liveness + analyses served
//   POST /api/v1/analyze   public   MarketSnapshot JSON -> AnalysisReport
//   GET  /api/v1/config    public   active AnalysisConfig
//   PUT  /api/v1/config    bearer   replace + persist the AnalysisConfig
//
// CORS is configured permissively; tighten `allow_origin` in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use crate::api::auth::AuthBearer;
use crate::app_state::AppState;
use crate::market_data::MarketSnapshot;
use crate::runtime_config::AnalysisConfig;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/config", get(get_config).put(put_config))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    analyses_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        analyses_served: state.analyses_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Analysis
// =============================================================================

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<MarketSnapshot>,
) -> impl IntoResponse {
    debug!(
        token = %snapshot.token_address,
        chain = %snapshot.chain,
        samples = snapshot.prices.len(),
        "analyze request"
    );
    Json(state.analyze(&snapshot))
}

// =============================================================================
// Configuration
// =============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config_snapshot())
}

async fn put_config(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
    Json(config): Json<AnalysisConfig>,
) -> impl IntoResponse {
    match state.replace_config(config.clone()) {
        Ok(()) => {
            info!(
                path = %state.config_path.display(),
                rsi_period = config.indicators.rsi_period,
                chains = config.chains.len(),
                "config updated via API"
            );
            Json(config).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to persist config");
            let body = serde_json::json!({ "error": format!("failed to persist config: {e:#}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state_in(dir: &std::path::Path) -> Arc<AppState> {
        Arc::new(AppState::new(
            AnalysisConfig::default(),
            dir.join("config.json"),
            Some("admin".to_string()),
        ))
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn json_request(method: Method, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_reports_counter() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();

        let (status, json) = send(&state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["analyses_served"], 0);
        assert!(json["server_time"].is_i64());
    }

    #[tokio::test]
    async fn analyze_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let prices: Vec<Value> = (100..=120)
            .map(|p| serde_json::json!({ "timestamp": p * 1000, "price": p }))
            .collect();
        let body = serde_json::json!({
            "token_address": "0xdead",
            "chain": "polygon",
            "prices": prices,
            "liquidity_usd": 2.5e6,
            "volume_24h": 1.0e6,
            "buys_24h": 120,
            "sells_24h": 100,
        });

        let (status, json) = send(
            &state,
            json_request(Method::POST, "/api/v1/analyze", body, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["chain_name"], "Polygon");
        assert_eq!(json["technical_analysis"]["indicators"]["RSI"], 100.0);
        assert!(json["risk_metrics"]["confidence_score"].is_number());
        assert_eq!(state.analyses_served(), 1);
    }

    #[tokio::test]
    async fn analyze_empty_history_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let body = serde_json::json!({ "token_address": "0x0", "prices": [] });

        let (status, json) = send(
            &state,
            json_request(Method::POST, "/api/v1/analyze", body, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "no_data");
        assert!(json.get("technical_analysis").is_none());
    }

    #[tokio::test]
    async fn put_config_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let body = serde_json::to_value(AnalysisConfig::default()).unwrap();

        let (status, _) = send(
            &state,
            json_request(Method::PUT, "/api/v1/config", body, Some("wrong")),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!dir.path().join("config.json").exists());
    }

    #[tokio::test]
    async fn put_config_persists_and_get_reflects_it() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let body = serde_json::json!({ "indicators": { "rsi_period": 9 } });

        let (status, json) = send(
            &state,
            json_request(Method::PUT, "/api/v1/config", body, Some("admin")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["indicators"]["rsi_period"], 9);
        // Missing sections fall back to defaults.
        assert_eq!(json["indicators"]["macd_slow"], 26);

        let request = Request::get("/api/v1/config").body(Body::empty()).unwrap();
        let (_, json) = send(&state, request).await;
        assert_eq!(json["indicators"]["rsi_period"], 9);

        let saved = AnalysisConfig::load(dir.path().join("config.json")).unwrap();
        assert_eq!(saved.indicators.rsi_period, 9);
    }
}
