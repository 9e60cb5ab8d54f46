//! Cheque domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Cheque status.
///
/// `Created` is the initial state. Any state may be changed to any other by
/// an authorized editor; see `ChequeLifecycle::is_valid_transition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Issued and not yet presented.
    Created,
    /// Deposited; counts against the attached invoice balance.
    Deposited,
    /// Bounced back by the bank.
    Returned,
    /// Cancelled.
    Voided,
}

impl ChequeStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Created, Self::Deposited, Self::Returned, Self::Voided];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Deposited => "deposited",
            Self::Returned => "returned",
            Self::Voided => "voided",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Some(Self::Created),
            "deposited" => Some(Self::Deposited),
            "returned" => Some(Self::Returned),
            "voided" => Some(Self::Voided),
            _ => None,
        }
    }

    /// Returns true if a cheque in this status has its amount applied to its invoice.
    #[must_use]
    pub const fn applies_to_invoice(&self) -> bool {
        matches!(self, Self::Deposited)
    }
}

impl fmt::Display for ChequeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, normalized cheque fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChequeFields {
    /// Cheque number as printed on the cheque.
    pub cheque_number: String,
    /// Payee name.
    pub beneficiary: String,
    /// Positive amount with at most two decimal places.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
    /// Free-text details, possibly empty.
    pub details: String,
    /// Issuing bank.
    pub bank_id: Uuid,
    /// Invoice the cheque pays, if any.
    pub invoice_id: Option<Uuid>,
}

/// An amount currently subtracted from an invoice balance by one cheque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceDeduction {
    /// Invoice whose balance was reduced.
    pub invoice_id: Uuid,
    /// Amount subtracted.
    pub amount: Decimal,
}

/// The persisted state of a cheque that update planning depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChequeSnapshot {
    /// Current status.
    pub status: ChequeStatus,
    /// Deduction in force, present only while deposited against an invoice.
    pub deduction: Option<InvoiceDeduction>,
}

/// One history entry to append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the change; `None` for the creation entry.
    pub previous: Option<ChequeStatus>,
    /// Status after the change.
    pub new: ChequeStatus,
    /// User who made the change.
    pub changed_by: Uuid,
}

/// A change to an invoice balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    /// Subtract the amount from the invoice balance.
    Deduct(InvoiceDeduction),
    /// Add a previously deducted amount back to the invoice balance.
    Restore(InvoiceDeduction),
}

impl BalanceEffect {
    /// Returns the invoice this effect applies to.
    #[must_use]
    pub const fn invoice_id(&self) -> Uuid {
        match self {
            Self::Deduct(d) | Self::Restore(d) => d.invoice_id,
        }
    }

    /// Returns the signed change to the invoice balance.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        match self {
            Self::Deduct(d) => -d.amount,
            Self::Restore(d) => d.amount,
        }
    }
}

/// Everything an update must persist, computed before touching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Status to store.
    pub status: ChequeStatus,
    /// History entry to append, if the status changed.
    pub history: Option<StatusChange>,
    /// Balance effects, in the order they must be applied.
    pub effects: Vec<BalanceEffect>,
    /// Deduction in force after the update.
    pub deduction: Option<InvoiceDeduction>,
}
