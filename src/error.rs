//! Error types for Bookshelf server
//!
//! Every failure is turned into the JSON envelope described in
//! [`crate::api::response`], with the envelope `status` mirrored on the
//! HTTP status line. Not-found and conflicts are reported as `400`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::response::ApiResponse;

/// Which unique key collided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Email,
    Username,
    EmailAndUsername,
    Title,
}

impl ConflictKind {
    pub fn message(&self) -> &'static str {
        match self {
            ConflictKind::Email => "Email already exist",
            ConflictKind::Username => "Username already exist",
            ConflictKind::EmailAndUsername => "Email and Username already exist",
            ConflictKind::Title => "Book title already present,Give a different title",
        }
    }
}

/// Which lookup came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Email,
    Username,
    Book,
}

impl NotFoundKind {
    pub fn message(&self) -> &'static str {
        match self {
            NotFoundKind::Email => "Email not found",
            NotFoundKind::Username => "Username not found",
            NotFoundKind::Book => "Book not found",
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {}", .0.message())]
    Conflict(ConflictKind),

    #[error("Not found: {}", .0.message())]
    NotFound(NotFoundKind),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Password incorrect")]
    IncorrectPassword,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// Status carried by the envelope and the HTTP status line
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::NotFound(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::IncorrectPassword | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_envelope(&self) -> ApiResponse<()> {
        let status = self.status();
        match self {
            AppError::Validation(reason) => {
                ApiResponse::new(status, "Validation Failed").with_error(reason.clone())
            }
            AppError::Conflict(kind) => {
                let mut body = ApiResponse::new(status, kind.message());
                match kind {
                    ConflictKind::Email => body.email_exists = Some(true),
                    ConflictKind::Username => body.username_exists = Some(true),
                    ConflictKind::EmailAndUsername => body.exists = Some(true),
                    ConflictKind::Title => {}
                }
                body
            }
            AppError::NotFound(kind) => {
                let mut body = ApiResponse::new(status, kind.message());
                if matches!(kind, NotFoundKind::Email | NotFoundKind::Username) {
                    body.exists = Some(false);
                }
                body
            }
            AppError::BadRequest(reason) => ApiResponse::new(status, reason.clone()),
            AppError::IncorrectPassword => {
                let mut body = ApiResponse::new(status, "Password incorrect");
                body.pw_exists = Some(false);
                body
            }
            AppError::Authentication(reason) => ApiResponse::new(status, reason.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ApiResponse::new(status, "Database error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiResponse::new(status, "Internal server error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_envelope().into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
