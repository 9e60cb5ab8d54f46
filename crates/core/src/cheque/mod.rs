//! Cheque lifecycle management.
//!
//! This module implements the cheque status state machine, the validation of
//! create/update payloads, and the planning of the invoice balance effects and
//! history entries a status change produces.
//!
//! # Modules
//!
//! - `types` - Cheque domain types (ChequeStatus, ChequeFields, UpdatePlan)
//! - `error` - Cheque-specific error types
//! - `validation` - Form parsing and field rules
//! - `lifecycle` - Transition check and update planning

pub mod error;
pub mod lifecycle;
pub mod types;
pub mod validation;

#[cfg(test)]
mod lifecycle_props;

pub use error::ChequeError;
pub use lifecycle::ChequeLifecycle;
pub use types::{
    BalanceEffect, ChequeFields, ChequeSnapshot, ChequeStatus, InvoiceDeduction, StatusChange,
    UpdatePlan,
};
pub use validation::{ChequeForm, UpdateChequeForm};
