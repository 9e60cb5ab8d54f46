//! Report data types.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cheque::ChequeStatus;

/// Inclusive range of whole UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    /// First day included.
    pub from: NaiveDate,
    /// Last day included.
    pub to: NaiveDate,
}

impl StatementPeriod {
    /// The calendar month containing `today`.
    #[must_use]
    pub fn current_month(today: NaiveDate) -> Self {
        let from = today.with_day0(0).unwrap_or(today);
        let to = from
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        Self { from, to }
    }

    /// Start of the first day, inclusive.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }

    /// Start of the day after the last day, exclusive.
    #[must_use]
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        self.to
            .succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, |day| {
                day.and_time(NaiveTime::MIN).and_utc()
            })
    }
}

/// Resolved account statement filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementFilter {
    /// Creation date range.
    pub period: StatementPeriod,
    /// Only cheques drawn on this bank.
    pub bank_id: Option<Uuid>,
    /// Only cheques in this status.
    pub status: Option<ChequeStatus>,
}

/// Sum of cheque amounts per status bucket.
///
/// `created` cheques are reported as `pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    /// Sum over all cheques.
    pub total: Decimal,
    /// Sum over deposited cheques.
    pub deposited: Decimal,
    /// Sum over created cheques.
    pub pending: Decimal,
    /// Sum over returned cheques.
    pub returned: Decimal,
    /// Sum over voided cheques.
    pub voided: Decimal,
}

impl StatementTotals {
    /// Adds one cheque to the totals.
    pub fn add(&mut self, status: ChequeStatus, amount: Decimal) {
        self.total += amount;
        match status {
            ChequeStatus::Created => self.pending += amount,
            ChequeStatus::Deposited => self.deposited += amount,
            ChequeStatus::Returned => self.returned += amount,
            ChequeStatus::Voided => self.voided += amount,
        }
    }
}

/// Number of cheques per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// All cheques.
    pub total: u64,
    /// Cheques in `created`.
    pub created: u64,
    /// Cheques in `deposited`.
    pub deposited: u64,
    /// Cheques in `returned`.
    pub returned: u64,
    /// Cheques in `voided`.
    pub voided: u64,
}

impl StatusCounts {
    /// Adds `count` cheques in `status`.
    pub fn add(&mut self, status: ChequeStatus, count: u64) {
        self.total += count;
        let bucket = match status {
            ChequeStatus::Created => &mut self.created,
            ChequeStatus::Deposited => &mut self.deposited,
            ChequeStatus::Returned => &mut self.returned,
            ChequeStatus::Voided => &mut self.voided,
        };
        *bucket += count;
    }
}
