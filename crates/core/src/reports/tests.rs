//! Tests for statement and dashboard calculations.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::StatementError;
use super::service::ReportService;
use super::types::StatementPeriod;
use crate::cheque::ChequeStatus;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_totals_bucket_by_status() {
    let totals = ReportService::compute_totals([
        (ChequeStatus::Deposited, dec!(100)),
        (ChequeStatus::Created, dec!(50)),
        (ChequeStatus::Returned, dec!(30)),
    ]);

    assert_eq!(totals.total, dec!(180));
    assert_eq!(totals.deposited, dec!(100));
    assert_eq!(totals.pending, dec!(50));
    assert_eq!(totals.returned, dec!(30));
    assert_eq!(totals.voided, dec!(0));
}

#[test]
fn test_totals_of_nothing_are_zero() {
    let totals = ReportService::compute_totals(std::iter::empty());
    assert_eq!(totals, super::types::StatementTotals::default());
}

#[test]
fn test_count_by_status() {
    let counts = ReportService::count_by_status([
        (ChequeStatus::Created, 3),
        (ChequeStatus::Voided, 1),
        (ChequeStatus::Created, 2),
    ]);

    assert_eq!(counts.total, 6);
    assert_eq!(counts.created, 5);
    assert_eq!(counts.voided, 1);
    assert_eq!(counts.deposited, 0);
}

#[rstest]
#[case(date(2026, 10, 18), date(2026, 10, 1), date(2026, 10, 31))]
#[case(date(2024, 2, 10), date(2024, 2, 1), date(2024, 2, 29))]
#[case(date(2026, 12, 31), date(2026, 12, 1), date(2026, 12, 31))]
fn test_current_month(#[case] today: NaiveDate, #[case] from: NaiveDate, #[case] to: NaiveDate) {
    let period = StatementPeriod::current_month(today);
    assert_eq!(period.from, from);
    assert_eq!(period.to, to);
}

#[test]
fn test_period_bounds_cover_whole_days() {
    let period = StatementPeriod {
        from: date(2026, 10, 1),
        to: date(2026, 10, 31),
    };

    assert_eq!(period.start(), Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
    assert_eq!(
        period.end_exclusive(),
        Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_resolve_period_defaults_missing_bounds() {
    let today = date(2026, 10, 18);

    let period = ReportService::resolve_period(None, None, today).unwrap();
    assert_eq!(period, StatementPeriod::current_month(today));

    let period = ReportService::resolve_period(Some(date(2026, 1, 1)), None, today).unwrap();
    assert_eq!(period.from, date(2026, 1, 1));
    assert_eq!(period.to, date(2026, 10, 31));
}

#[test]
fn test_resolve_period_rejects_inverted_range() {
    let result = ReportService::resolve_period(
        Some(date(2026, 10, 20)),
        Some(date(2026, 10, 1)),
        date(2026, 10, 18),
    );

    let err = result.unwrap_err();
    assert!(matches!(err, StatementError::InvalidDateRange { .. }));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[test]
fn test_parse_filter() {
    let filter = ReportService::parse_filter(
        Some("2026-10-01"),
        Some("2026-10-15"),
        Some("0193a5a0-0000-7000-8000-000000000001"),
        Some("deposited"),
        date(2026, 10, 18),
    )
    .unwrap();

    assert_eq!(filter.period.from, date(2026, 10, 1));
    assert_eq!(filter.period.to, date(2026, 10, 15));
    assert!(filter.bank_id.is_some());
    assert_eq!(filter.status, Some(ChequeStatus::Deposited));

    let filter = ReportService::parse_filter(Some(""), None, Some(" "), Some(""), date(2026, 10, 18))
        .unwrap();
    assert_eq!(filter.bank_id, None);
    assert_eq!(filter.status, None);
}

#[rstest]
#[case(Some("18/10/2026"), None, None)]
#[case(None, Some("yesterday"), None)]
#[case(None, None, Some("bounced"))]
fn test_parse_filter_rejects_malformed(
    #[case] from: Option<&str>,
    #[case] to: Option<&str>,
    #[case] status: Option<&str>,
) {
    assert!(ReportService::parse_filter(from, to, None, status, date(2026, 10, 18)).is_err());
}

#[test]
fn test_parse_filter_rejects_bad_bank() {
    let err = ReportService::parse_filter(None, None, Some("main"), None, date(2026, 10, 18))
        .unwrap_err();
    assert!(matches!(err, StatementError::InvalidBank(_)));
}

fn arb_row() -> impl Strategy<Value = (ChequeStatus, Decimal)> {
    (
        prop_oneof![
            Just(ChequeStatus::Created),
            Just(ChequeStatus::Deposited),
            Just(ChequeStatus::Returned),
            Just(ChequeStatus::Voided),
        ],
        (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    )
}

proptest! {
    /// The buckets always add up to the total.
    #[test]
    fn prop_buckets_sum_to_total(rows in prop::collection::vec(arb_row(), 0..50)) {
        let expected: Decimal = rows.iter().map(|(_, amount)| *amount).sum();
        let totals = ReportService::compute_totals(rows);

        prop_assert_eq!(totals.total, expected);
        prop_assert_eq!(
            totals.deposited + totals.pending + totals.returned + totals.voided,
            totals.total
        );
    }
}
