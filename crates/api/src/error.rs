//! Conversion of domain errors into JSON error responses.
//!
//! Every error is folded into the shared `AppError` taxonomy and rendered as
//! `{"error": "<code>", "message": "<text>"}`. When the domain error carries a
//! more specific code than its taxonomy category (`BANK_IN_USE` rather than
//! `CONFLICT`), it is added as `"reason"`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::{error, warn};

use chequebook_core::cheque::ChequeError;
use chequebook_core::reports::StatementError;
use chequebook_db::{BankError, InvoiceError, UserError};
use chequebook_shared::AppError;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    /// Taxonomy category, which decides status and `error` code.
    pub error: AppError,
    /// Domain-specific code, when it differs from the category's.
    pub reason: Option<&'static str>,
}

impl ApiError {
    /// Shorthand for a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into()).into()
    }

    /// Builds an error from a domain error's status, code and message.
    ///
    /// Server-side statuses become `Database` when the code says so and
    /// `Internal` otherwise.
    fn domain(status: u16, code: &'static str, message: String) -> Self {
        let error = match status {
            400 => AppError::Validation(message),
            401 => AppError::Unauthorized(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            _ if code == "DATABASE_ERROR" => AppError::Database(message),
            _ => AppError::Internal(message),
        };
        let reason = (code != error.error_code()).then_some(code);
        Self { error, reason }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self { error: err, reason } = self;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Store details stay in the log.
        let message = if err.is_server_error() {
            error!(error = %err, reason, "Request failed");
            "An internal error occurred".to_string()
        } else {
            warn!(error = %err, reason, "Request rejected");
            match &err {
                AppError::Unauthorized(m)
                | AppError::Forbidden(m)
                | AppError::NotFound(m)
                | AppError::Validation(m)
                | AppError::Conflict(m)
                | AppError::Database(m)
                | AppError::Internal(m) => m.clone(),
            }
        };

        let mut body = json!({
            "error": err.error_code(),
            "message": message,
        });
        if let Some(reason) = reason {
            body["reason"] = json!(reason);
        }

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            reason: None,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

/// Domain errors expose `status_code()` and `error_code()`; each maps the same way.
macro_rules! from_domain_error {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for ApiError {
                fn from(err: $error) -> Self {
                    Self::domain(err.status_code(), err.error_code(), err.to_string())
                }
            }
        )+
    };
}

from_domain_error!(ChequeError, StatementError, BankError, UserError, InvoiceError);

/// Malformed request bodies, paths and query strings are validation errors.
macro_rules! from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Validation(rejection.body_text()).into()
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);
