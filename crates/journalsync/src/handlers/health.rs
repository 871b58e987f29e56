//! Health check endpoints for Kubernetes-style liveness and readiness checks.
//!
//! - `/livez` - Basic liveness check (immediate 200, no checks)
//! - `/healthz` - Checks the account store and the cache store

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use journalsync_core::cache::Cache;
use journalsync_core::storage::AccountRepository;

use crate::state::AppState;

const HEALTH_KEY: &str = "healthz:check";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub storage: bool,
    pub cache: bool,
    pub config_keys: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// GET /livez - Basic liveness check.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Store and cache reachability.
///
/// Returns 200 when both answer, 503 otherwise. An empty config cache is
/// reported but does not make the service unhealthy.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    let mut errors = Vec::new();

    let storage = match state.accounts.get_account(HEALTH_KEY).await {
        Ok(_) => true,
        Err(e) => {
            errors.push(format!("storage: {e}"));
            false
        }
    };
    let cache = match state.cache.get(HEALTH_KEY).await {
        Ok(_) => true,
        Err(e) => {
            errors.push(format!("cache: {e}"));
            false
        }
    };
    if state.config_cache.is_empty() {
        errors.push("config: no keys loaded".to_string());
    }

    let status = HealthStatus {
        healthy: storage && cache,
        storage,
        cache,
        config_keys: state.config_cache.len(),
        errors,
    };
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status)).into_response()
}
