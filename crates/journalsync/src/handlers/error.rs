use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use journalsync_core::cache::CacheError;
use journalsync_core::journal::{journal_error_to_status_code, EntryError, JournalError};
use journalsync_core::lookup::ConfigError;
use journalsync_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::services::{MailError, SendMailError};

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(err) = self.0.downcast_ref::<JournalError>() {
            journal_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<SendMailError>() {
            match err {
                SendMailError::Account(err) => journal_error_to_status_code(err),
                SendMailError::Mail(MailError::InvalidRecipient(_)) => 400,
                SendMailError::Mail(MailError::Transport(_)) => 502,
            }
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else if self.0.downcast_ref::<EntryError>().is_some() {
            400
        } else if let Some(err) = self.0.downcast_ref::<ConfigError>() {
            match err {
                ConfigError::NotFound(_) => 404,
                ConfigError::SourceFailed(_) => 503,
            }
        } else if self.0.downcast_ref::<CacheError>().is_some() {
            503
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() || status_code == StatusCode::CONFLICT {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        }
        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
