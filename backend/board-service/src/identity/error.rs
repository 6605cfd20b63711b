use std::fmt;
use thiserror::Error;

/// Vendor-style identity error codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    PopupBlocked,
    PopupClosedByUser,
    NetworkRequestFailed,
    Internal,
    Other(String),
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::PopupBlocked => "auth/popup-blocked",
            AuthErrorCode::PopupClosedByUser => "auth/popup-closed-by-user",
            AuthErrorCode::NetworkRequestFailed => "auth/network-request-failed",
            AuthErrorCode::Internal => "auth/internal-error",
            AuthErrorCode::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" => AuthErrorCode::EmailAlreadyInUse,
            "auth/invalid-email" => AuthErrorCode::InvalidEmail,
            "auth/weak-password" => AuthErrorCode::WeakPassword,
            "auth/user-not-found" => AuthErrorCode::UserNotFound,
            "auth/wrong-password" => AuthErrorCode::WrongPassword,
            "auth/popup-blocked" => AuthErrorCode::PopupBlocked,
            "auth/popup-closed-by-user" => AuthErrorCode::PopupClosedByUser,
            "auth/network-request-failed" => AuthErrorCode::NetworkRequestFailed,
            "auth/internal-error" => AuthErrorCode::Internal,
            other => AuthErrorCode::Other(other.to_string()),
        }
    }

    /// Errors the user can fix by changing what they typed
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            AuthErrorCode::EmailAlreadyInUse
                | AuthErrorCode::InvalidEmail
                | AuthErrorCode::WeakPassword
                | AuthErrorCode::UserNotFound
                | AuthErrorCode::WrongPassword
        )
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {detail}")]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub detail: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::Internal, detail)
    }
}

impl From<AuthErrorCode> for AuthError {
    fn from(code: AuthErrorCode) -> Self {
        let detail = code.as_str().to_string();
        Self { code, detail }
    }
}
