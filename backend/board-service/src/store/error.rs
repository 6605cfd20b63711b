use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a document store backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("document is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("document not found: {0}")]
    NotFound(Uuid),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied)
    }

    /// Label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::PermissionDenied => "permission_denied",
            StoreError::PayloadTooLarge { .. } => "too_large",
            StoreError::NotFound(_) => "not_found",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Malformed(_) => "malformed",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // insufficient_privilege
                Some("42501") => StoreError::PermissionDenied,
                // program_limit_exceeded
                Some("54000") => StoreError::PayloadTooLarge { size: 0, limit: 0 },
                _ => StoreError::Unavailable(db_err.to_string()),
            },
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug, Error)]
    #[error("database error {code}")]
    struct CodedError {
        code: &'static str,
    }

    impl DatabaseError for CodedError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn sqlstate(code: &'static str) -> StoreError {
        StoreError::from(sqlx::Error::Database(Box::new(CodedError { code })))
    }

    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(sqlstate("42501"), StoreError::PermissionDenied);
        assert!(matches!(sqlstate("54000"), StoreError::PayloadTooLarge { .. }));
        assert!(matches!(sqlstate("23505"), StoreError::Unavailable(_)));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(StoreError::PermissionDenied.kind(), "permission_denied");
        assert_eq!(StoreError::NotFound(uuid::Uuid::nil()).kind(), "not_found");
    }
}
