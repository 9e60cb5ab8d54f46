//! Statement and dashboard calculations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::StatementError;
use super::types::{StatementFilter, StatementPeriod, StatementTotals, StatusCounts};
use crate::cheque::ChequeStatus;

/// Service for computing report figures.
pub struct ReportService;

impl ReportService {
    /// Sums cheque amounts per status bucket.
    ///
    /// # Example
    ///
    /// ```
    /// use chequebook_core::cheque::ChequeStatus;
    /// use chequebook_core::reports::ReportService;
    /// use rust_decimal::Decimal;
    ///
    /// let totals = ReportService::compute_totals([
    ///     (ChequeStatus::Deposited, Decimal::from(100)),
    ///     (ChequeStatus::Created, Decimal::from(50)),
    /// ]);
    /// assert_eq!(totals.total, Decimal::from(150));
    /// assert_eq!(totals.pending, Decimal::from(50));
    /// ```
    #[must_use]
    pub fn compute_totals<I>(cheques: I) -> StatementTotals
    where
        I: IntoIterator<Item = (ChequeStatus, Decimal)>,
    {
        cheques
            .into_iter()
            .fold(StatementTotals::default(), |mut totals, (status, amount)| {
                totals.add(status, amount);
                totals
            })
    }

    /// Folds grouped `(status, count)` rows into per-status counts.
    #[must_use]
    pub fn count_by_status<I>(rows: I) -> StatusCounts
    where
        I: IntoIterator<Item = (ChequeStatus, u64)>,
    {
        rows.into_iter()
            .fold(StatusCounts::default(), |mut counts, (status, count)| {
                counts.add(status, count);
                counts
            })
    }

    /// Resolves the statement period, defaulting each missing bound to the
    /// current month.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::InvalidDateRange` if `from` is after `to`.
    pub fn resolve_period(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<StatementPeriod, StatementError> {
        let month = StatementPeriod::current_month(today);
        let period = StatementPeriod {
            from: from.unwrap_or(month.from),
            to: to.unwrap_or(month.to),
        };

        if period.from > period.to {
            return Err(StatementError::InvalidDateRange {
                start: period.from,
                end: period.to,
            });
        }

        Ok(period)
    }

    /// Parses raw statement query parameters.
    ///
    /// Blank values are treated as absent. Dates are `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns a `StatementError` for malformed parameters or an inverted range.
    pub fn parse_filter(
        from: Option<&str>,
        to: Option<&str>,
        bank_id: Option<&str>,
        status: Option<&str>,
        today: NaiveDate,
    ) -> Result<StatementFilter, StatementError> {
        let from = non_blank(from).map(|v| parse_date("from", v)).transpose()?;
        let to = non_blank(to).map(|v| parse_date("to", v)).transpose()?;
        let period = Self::resolve_period(from, to, today)?;

        let bank_id = non_blank(bank_id)
            .map(|v| Uuid::parse_str(v).map_err(|_| StatementError::InvalidBank(v.to_string())))
            .transpose()?;
        let status = non_blank(status)
            .map(|v| ChequeStatus::parse(v).ok_or_else(|| StatementError::InvalidStatus(v.to_string())))
            .transpose()?;

        Ok(StatementFilter {
            period,
            bank_id,
            status,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, StatementError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| StatementError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
