//! Administrative endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use journalsync_core::cache::Cache;
use journalsync_core::journal::{AccountSummary, CreateAccountRequest};
use journalsync_core::storage::AccountRepository;

use crate::handlers::AppError;
use crate::services::DigestReport;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheReset {
    pub config_keys: usize,
}

/// GET /api/admin/users
#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let accounts = state.accounts.list_accounts().await?;
    Ok(Json(accounts.iter().map(|a| a.summary()).collect()))
}

/// POST /api/admin/create-admin-user
#[axum::debug_handler]
pub async fn create_admin_user(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountSummary>), AppError> {
    let account = state.users.create_admin(&request).await?;
    Ok((StatusCode::CREATED, Json(account.summary())))
}

/// POST /api/admin/clear-app-cache
///
/// Reloads the config cache from its source and empties the cache store.
#[axum::debug_handler]
pub async fn clear_app_cache(State(state): State<AppState>) -> Result<Json<CacheReset>, AppError> {
    let config_keys = state.config_cache.init().await?;
    state.cache.invalidate_all().await?;
    tracing::info!(config_keys, "Application caches reset");
    Ok(Json(CacheReset { config_keys }))
}

/// POST /api/admin/sentiment-digest - Runs one digest pass now.
#[axum::debug_handler]
pub async fn run_sentiment_digest(
    State(state): State<AppState>,
) -> Result<Json<DigestReport>, AppError> {
    Ok(Json(state.digest.run_once(Utc::now()).await?))
}
