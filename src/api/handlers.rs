use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

use crate::analyzer::AddressAnalysis;
use crate::config::AnomalyDetectionConfig;

use super::types::*;
use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn api_error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: msg.into(),
        }),
    )
}

// ============================================================
// Health & Config
// ============================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn detection_config(State(state): State<Arc<AppState>>) -> Json<AnomalyDetectionConfig> {
    Json(state.analyzer.anomaly_engine.config().clone())
}

// ============================================================
// Analysis
// ============================================================

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<AddressAnalysis> {
    if !is_valid_address(&req.address) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid address '{}'", req.address),
        ));
    }

    let reference_time = match req.reference_time {
        Some(secs) => Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid referenceTime {}", secs),
            )
        })?,
        None => Utc::now(),
    };

    state
        .analyzer
        .analyze(&req.address, &req.transactions, reference_time)
        .map(Json)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}
