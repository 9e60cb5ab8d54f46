//! Account statement and dashboard figures.
//!
//! Pure folds over cheque rows loaded by the persistence layer:
//! - Statement filter resolution (date range, bank, status)
//! - Statement totals per status bucket
//! - Dashboard counts per status

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::StatementError;
pub use service::ReportService;
pub use types::*;
