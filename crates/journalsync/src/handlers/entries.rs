//! Journal entry endpoints, scoped to one account.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use journalsync_core::journal::{CreateEntryRequest, JournalEntry, UpdateEntryRequest};

use crate::handlers::AppError;
use crate::state::AppState;

/// Result of a delete; deleting an entry that is not on the account is not an error.
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
}

/// POST /api/users/{username}/entries
#[axum::debug_handler]
pub async fn create_entry(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), AppError> {
    let entry = state
        .journal
        .create_entry(request.into_draft(), &username)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/users/{username}/entries
#[axum::debug_handler]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    Ok(Json(state.journal.list_entries(&username).await?))
}

/// GET /api/users/{username}/entries/{id}
#[axum::debug_handler]
pub async fn get_entry(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, Uuid)>,
) -> Result<Json<JournalEntry>, AppError> {
    Ok(Json(state.journal.get_entry(id, &username).await?))
}

/// PUT /api/users/{username}/entries/{id}
#[axum::debug_handler]
pub async fn update_entry(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<JournalEntry>, AppError> {
    Ok(Json(
        state.journal.update_entry(id, &username, &request).await?,
    ))
}

/// DELETE /api/users/{username}/entries/{id}
#[axum::debug_handler]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, Uuid)>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let deleted = state.journal.delete_entry(id, &username).await?;
    Ok(Json(DeleteOutcome { deleted }))
}
