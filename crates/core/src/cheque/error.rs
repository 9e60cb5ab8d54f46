//! Cheque error types.

use thiserror::Error;
use uuid::Uuid;

use crate::cheque::types::ChequeStatus;

/// Errors that can occur during cheque operations.
#[derive(Debug, Error)]
pub enum ChequeError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field is present but malformed.
    #[error("Invalid {field}: {message}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Cheque not found.
    #[error("Cheque {0} not found")]
    ChequeNotFound(Uuid),

    /// The actor may not edit a cheque in its current status.
    #[error("A cheque in status {status} can only be edited by an administrator")]
    EditForbidden {
        /// The cheque's current status.
        status: ChequeStatus,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ChequeStatus,
        /// The attempted target status.
        to: ChequeStatus,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ChequeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingField(_) | Self::InvalidField { .. } | Self::InvalidTransition { .. } => {
                400
            }
            Self::EditForbidden { .. } => 403,
            Self::ChequeNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::InvalidField { .. } => "VALIDATION_ERROR",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::EditForbidden { .. } => "EDIT_FORBIDDEN",
            Self::ChequeNotFound(_) => "CHEQUE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}
