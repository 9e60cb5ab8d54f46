//! Property-based tests for `ChequeLifecycle`.
//!
//! Random sequences of status updates are replayed against a single invoice
//! balance to check that a cheque never holds more than one deduction.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cheque::lifecycle::ChequeLifecycle;
use crate::cheque::types::{ChequeFields, ChequeSnapshot, ChequeStatus};

/// Strategy for generating random ChequeStatus values.
fn arb_status() -> impl Strategy<Value = ChequeStatus> {
    prop_oneof![
        Just(ChequeStatus::Created),
        Just(ChequeStatus::Deposited),
        Just(ChequeStatus::Returned),
        Just(ChequeStatus::Voided),
    ]
}

/// Strategy for generating amounts from 0.01 to 1,000,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn fields(amount: Decimal, invoice_id: Option<Uuid>) -> ChequeFields {
    ChequeFields {
        cheque_number: "1".to_string(),
        beneficiary: "Payee".to_string(),
        amount,
        due_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
        details: String::new(),
        bank_id: Uuid::nil(),
        invoice_id,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Replaying any update sequence leaves the invoice reduced by the
    /// current deduction and nothing else.
    #[test]
    fn prop_balance_matches_held_deduction(
        steps in prop::collection::vec((arb_status(), arb_amount(), any::<bool>()), 1..30),
        invoice in arb_uuid(),
        user in arb_uuid(),
    ) {
        let opening = Decimal::new(1_000_000_000, 2);
        let mut balance = opening;
        let mut snapshot = ChequeSnapshot {
            status: ChequeLifecycle::INITIAL_STATUS,
            deduction: None,
        };

        for (status, amount, attached) in steps {
            let form = fields(amount, attached.then_some(invoice));
            let plan = ChequeLifecycle::plan_update(&snapshot, &form, Some(status), user)
                .expect("requested statuses are always accepted");

            for effect in &plan.effects {
                prop_assert_eq!(effect.invoice_id(), invoice);
                balance += effect.delta();
            }
            snapshot = ChequeSnapshot {
                status: plan.status,
                deduction: plan.deduction,
            };

            let held = snapshot.deduction.map_or(Decimal::ZERO, |d| d.amount);
            prop_assert_eq!(balance, opening - held);
            prop_assert!(snapshot.deduction.is_none() || snapshot.status == ChequeStatus::Deposited);
        }
    }

    /// Submitting the current status again never produces effects or history.
    #[test]
    fn prop_repeated_status_is_idempotent(
        status in arb_status(),
        amount in arb_amount(),
        invoice in arb_uuid(),
        user in arb_uuid(),
    ) {
        let form = fields(amount, Some(invoice));
        let first = ChequeLifecycle::plan_update(
            &ChequeSnapshot { status: ChequeStatus::Created, deduction: None },
            &form,
            Some(status),
            user,
        ).expect("accepted");

        let after = ChequeSnapshot { status: first.status, deduction: first.deduction };
        let second = ChequeLifecycle::plan_update(&after, &form, Some(status), user)
            .expect("accepted");

        prop_assert!(second.history.is_none());
        prop_assert!(second.effects.is_empty());
        prop_assert_eq!(second.deduction, first.deduction);
    }

    /// A status change always records exactly one history entry.
    #[test]
    fn prop_status_change_records_history(
        from in arb_status(),
        to in arb_status(),
        user in arb_uuid(),
    ) {
        prop_assume!(from != to);

        let plan = ChequeLifecycle::plan_update(
            &ChequeSnapshot { status: from, deduction: None },
            &fields(Decimal::ONE, None),
            Some(to),
            user,
        ).expect("accepted");

        let entry = plan.history.expect("history entry");
        prop_assert_eq!(entry.previous, Some(from));
        prop_assert_eq!(entry.new, to);
        prop_assert_eq!(entry.changed_by, user);
    }
}
