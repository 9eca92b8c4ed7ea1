//! Liveness and store connectivity.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub server_time: String,
}

/// `GET /health`: 200 when the store answers, 503 otherwise.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.db.health_check().await;
    if !healthy {
        warn!("Health check failed: database unreachable");
    }

    let (status, body) = if healthy {
        (StatusCode::OK, ("ok", "connected"))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ("unavailable", "disconnected"))
    };

    (
        status,
        Json(HealthResponse {
            status: body.0.to_string(),
            database: body.1.to_string(),
            server_time: Utc::now().to_rfc3339(),
        }),
    )
}
