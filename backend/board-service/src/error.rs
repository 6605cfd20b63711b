/// Error types for Board Service
///
/// Every failure reaching an HTTP handler becomes an `AppError`, rendered
/// as a JSON body `{ "error", "status" }`.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::board::BoardError;
use crate::composer::ComposerError;
use crate::shell::ShellError;
use crate::store::StoreError;

/// Result type for board-service handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied => AppError::Forbidden(err.to_string()),
            StoreError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Unavailable(_) => AppError::Unavailable(err.to_string()),
            StoreError::Malformed(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::NotAuthor => AppError::Forbidden(err.to_string()),
            BoardError::UnknownPost(_) => AppError::NotFound(err.to_string()),
            BoardError::Store(inner) => inner.into(),
        }
    }
}

impl From<ComposerError> for AppError {
    fn from(err: ComposerError) -> Self {
        match err {
            ComposerError::EmptySubmission
            | ComposerError::UnsupportedImage(_)
            | ComposerError::Buffer(_) => AppError::BadRequest(err.to_string()),
            ComposerError::LoginRequired => AppError::Unauthorized(err.to_string()),
            ComposerError::PermissionDenied => AppError::Forbidden(err.to_string()),
            ComposerError::PayloadTooLarge => AppError::PayloadTooLarge(err.to_string()),
            ComposerError::SaveFailed(_) => AppError::Unavailable(err.to_string()),
        }
    }
}

impl From<ShellError> for AppError {
    fn from(err: ShellError) -> Self {
        match err {
            ShellError::NotAnonymous => AppError::Conflict(err.to_string()),
            ShellError::NotAuthenticated => AppError::Unauthorized(err.to_string()),
            ShellError::Auth { message, source } => {
                if source.code.is_user_correctable() {
                    AppError::BadRequest(message)
                } else {
                    AppError::Unauthorized(message)
                }
            }
            ShellError::Composer(inner) => inner.into(),
            ShellError::Board(inner) => inner.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AuthError, AuthErrorCode};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(StoreError::PermissionDenied).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(ComposerError::PayloadTooLarge).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::from(BoardError::NotAuthor).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(ShellError::NotAuthenticated).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_auth_message_is_kept() {
        let err = AppError::from(ShellError::Auth {
            message: "Email or password does not match.".into(),
            source: AuthError::from(AuthErrorCode::WrongPassword),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Email or password does not match."));
    }
}
