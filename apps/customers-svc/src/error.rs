//! Error types for the customers service.
//!
//! NATS has no status channel of its own, so failures travel inside the
//! reply payload as `{status, message}` - the same shape the rest of the
//! platform's services emit.

use serde::{Deserialize, Serialize};

use mesa_core::{CoreError, ValidationError};
use mesa_db::DbError;

/// Service-level errors, each mapping to a wire status code.
#[derive(Debug, thiserror::Error)]
pub enum SvcError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl SvcError {
    /// HTTP-style status code carried in the error reply.
    pub fn status(&self) -> u16 {
        match self {
            SvcError::NotFound(_) => 404,
            SvcError::Conflict(_) => 409,
            SvcError::BadRequest(_) => 400,
            SvcError::Internal(_) => 500,
        }
    }

    /// The wire representation of this error.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            status: self.status(),
            message: self.to_string(),
        }
    }
}

/// Structured error body placed in the reply envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: u16,
    pub message: String,
}

impl From<CoreError> for SvcError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            err if err.is_not_found() => SvcError::NotFound(message),
            CoreError::EmailTaken(_) => SvcError::Conflict(message),
            CoreError::CartTooLarge { .. } | CoreError::Validation(_) => {
                SvcError::BadRequest(message)
            }
            _ => SvcError::Internal(message),
        }
    }
}

impl From<ValidationError> for SvcError {
    fn from(err: ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<DbError> for SvcError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => SvcError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => SvcError::Conflict(err.to_string()),
            other => SvcError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SvcError {
    fn from(err: serde_json::Error) -> Self {
        SvcError::BadRequest(format!("Invalid payload: {err}"))
    }
}
