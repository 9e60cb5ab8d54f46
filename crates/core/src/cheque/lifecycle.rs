//! Cheque status state machine and update planning.
//!
//! A cheque enters the lifecycle as `created`. An authorized editor may move
//! it to any other status. While a cheque is `deposited` against an invoice,
//! its amount is held as a deduction from that invoice balance:
//!
//! - entering `deposited` with an invoice attached records a deduction
//! - leaving `deposited` restores exactly the recorded deduction
//! - re-submitting the current status changes nothing

use uuid::Uuid;

use crate::auth::Actor;
use crate::cheque::error::ChequeError;
use crate::cheque::types::{
    BalanceEffect, ChequeFields, ChequeSnapshot, ChequeStatus, InvoiceDeduction, StatusChange,
    UpdatePlan,
};

/// Stateless service for cheque status transitions.
pub struct ChequeLifecycle;

impl ChequeLifecycle {
    /// Status every new cheque starts in.
    pub const INITIAL_STATUS: ChequeStatus = ChequeStatus::Created;

    /// Returns true if a cheque may move from `from` to `to`.
    ///
    /// Every change between distinct statuses is allowed. Staying in the
    /// same status is not a transition.
    #[must_use]
    pub fn is_valid_transition(from: ChequeStatus, to: ChequeStatus) -> bool {
        from != to
    }

    /// History entry written when a cheque is registered.
    #[must_use]
    pub const fn creation_entry(created_by: Uuid) -> StatusChange {
        StatusChange {
            previous: None,
            new: Self::INITIAL_STATUS,
            changed_by: created_by,
        }
    }

    /// Checks that `actor` may edit a cheque currently in `status`.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::EditForbidden` when a non-admin edits a cheque
    /// that has left `created`.
    pub fn authorize_edit(actor: &Actor, status: ChequeStatus) -> Result<(), ChequeError> {
        if actor.role.can_edit_cheque(status) {
            Ok(())
        } else {
            Err(ChequeError::EditForbidden { status })
        }
    }

    /// Computes the status, history entry and balance effects of an update.
    ///
    /// `requested` of `None` keeps the current status. Effects are ordered:
    /// a restore of the old deduction always precedes a new deduction.
    ///
    /// # Arguments
    /// * `current` - Persisted status and deduction of the cheque
    /// * `fields` - Validated fields being saved with the update
    /// * `requested` - Requested status, if any
    /// * `changed_by` - The user making the change
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::InvalidTransition` if the transition is rejected.
    pub fn plan_update(
        current: &ChequeSnapshot,
        fields: &ChequeFields,
        requested: Option<ChequeStatus>,
        changed_by: Uuid,
    ) -> Result<UpdatePlan, ChequeError> {
        let target = requested.unwrap_or(current.status);

        if target == current.status {
            return Ok(UpdatePlan {
                status: current.status,
                history: None,
                effects: Vec::new(),
                deduction: current.deduction,
            });
        }

        if !Self::is_valid_transition(current.status, target) {
            return Err(ChequeError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let mut effects = Vec::with_capacity(2);
        if let Some(held) = current.deduction {
            effects.push(BalanceEffect::Restore(held));
        }

        let deduction = match fields.invoice_id {
            Some(invoice_id) if target.applies_to_invoice() => Some(InvoiceDeduction {
                invoice_id,
                amount: fields.amount,
            }),
            _ => None,
        };
        if let Some(new_deduction) = deduction {
            effects.push(BalanceEffect::Deduct(new_deduction));
        }

        Ok(UpdatePlan {
            status: target,
            history: Some(StatusChange {
                previous: Some(current.status),
                new: target,
                changed_by,
            }),
            effects,
            deduction,
        })
    }
}
