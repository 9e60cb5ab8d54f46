//! Statement error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// A date parameter is not `YYYY-MM-DD`.
    #[error("Invalid {field} date: {value}")]
    InvalidDate {
        /// Parameter name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Bank filter is not a UUID.
    #[error("Invalid bank_id: {0}")]
    InvalidBank(String),

    /// Status filter is not a known status.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

impl StatementError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "VALIDATION_ERROR"
    }
}
