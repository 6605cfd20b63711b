use thiserror::Error;

use crate::model::Position;

/// Errors raised by buffer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("position {0} is outside the document")]
    OutOfRange(Position),

    #[error("unknown formatting command: {0}")]
    UnknownCommand(String),
}
