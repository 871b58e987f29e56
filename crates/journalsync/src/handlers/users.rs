//! Account-level endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use journalsync_core::journal::{
    AccountSummary, CreateAccountRequest, SendMailRequest, UpdateProfileRequest,
};

use crate::handlers::AppError;
use crate::state::AppState;

/// POST /api/users
#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountSummary>), AppError> {
    let account = state.users.sign_up(&request).await?;
    Ok((StatusCode::CREATED, Json(account.summary())))
}

/// PUT /api/users/{username} - Email, password and digest opt-in.
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(update): Json<UpdateProfileRequest>,
) -> Result<Json<AccountSummary>, AppError> {
    let account = state.users.update_profile(&username, &update).await?;
    Ok(Json(account.summary()))
}

/// POST /api/users/{username}/send-email
#[axum::debug_handler]
pub async fn send_mail(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<SendMailRequest>,
) -> Result<StatusCode, AppError> {
    state.users.send_mail(&username, &request).await?;
    Ok(StatusCode::ACCEPTED)
}

/// DELETE /api/users/{username} - Deletes the account and all of its entries.
#[axum::debug_handler]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    state.journal.delete_account(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{username}/greeting/{city}
///
/// Weather lookup failures only drop the weather sentence.
#[axum::debug_handler]
pub async fn greeting(
    State(state): State<AppState>,
    Path((username, city)): Path<(String, String)>,
) -> String {
    state.weather.greeting(&username, &city).await
}
