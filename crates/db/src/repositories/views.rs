//! Read models joining cheques with their reference labels.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use chequebook_core::cheque::ChequeStatus;

use crate::entities::{banks, cheque_history, cheques, invoices, users};

/// A cheque with bank, invoice and creator labels resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ChequeView {
    /// Cheque ID.
    pub id: Uuid,
    /// Cheque number.
    pub cheque_number: String,
    /// Beneficiary.
    pub beneficiary: String,
    /// Amount.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
    /// Details.
    pub details: String,
    /// Status.
    pub status: ChequeStatus,
    /// Bank ID.
    pub bank_id: Uuid,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Invoice ID.
    pub invoice_id: Option<Uuid>,
    /// Invoice number.
    pub invoice_number: Option<String>,
    /// Invoice original amount.
    pub invoice_amount: Option<Decimal>,
    /// Invoice running balance.
    pub invoice_balance: Option<Decimal>,
    /// Amount currently deducted from an invoice by this cheque.
    pub deducted_amount: Option<Decimal>,
    /// Creator ID.
    pub created_by: Uuid,
    /// Creator username, if the user still exists.
    pub created_by_username: Option<String>,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

/// One status history entry.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Cheque ID.
    pub cheque_id: Uuid,
    /// Status before the change; `None` for creation.
    pub previous_status: Option<ChequeStatus>,
    /// Status after the change.
    pub new_status: ChequeStatus,
    /// User who made the change.
    pub changed_by: Uuid,
    /// Username of `changed_by`, if the user still exists.
    pub changed_by_username: Option<String>,
    /// Change timestamp.
    pub changed_at: DateTime<FixedOffset>,
}

impl HistoryEntry {
    pub(crate) fn from_row(entry: cheque_history::Model, user: Option<users::Model>) -> Self {
        Self {
            id: entry.id,
            cheque_id: entry.cheque_id,
            previous_status: entry.previous_status.map(Into::into),
            new_status: entry.new_status.into(),
            changed_by: entry.changed_by,
            changed_by_username: user.map(|u| u.username),
            changed_at: entry.changed_at,
        }
    }
}

/// Lookup tables for the labels of a batch of cheques.
#[derive(Debug, Default)]
pub(crate) struct Labels {
    banks: HashMap<Uuid, String>,
    users: HashMap<Uuid, String>,
    invoices: HashMap<Uuid, invoices::Model>,
}

impl Labels {
    /// Loads every bank, invoice and creator referenced by `rows`.
    pub(crate) async fn load<C: ConnectionTrait>(
        conn: &C,
        rows: &[cheques::Model],
    ) -> Result<Self, DbErr> {
        if rows.is_empty() {
            return Ok(Self::default());
        }

        let bank_ids: HashSet<Uuid> = rows.iter().map(|c| c.bank_id).collect();
        let user_ids: HashSet<Uuid> = rows.iter().map(|c| c.created_by).collect();
        let invoice_ids: HashSet<Uuid> = rows.iter().filter_map(|c| c.invoice_id).collect();

        let banks = banks::Entity::find()
            .filter(banks::Column::Id.is_in(bank_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        let users = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let invoices = if invoice_ids.is_empty() {
            HashMap::new()
        } else {
            invoices::Entity::find()
                .filter(invoices::Column::Id.is_in(invoice_ids))
                .all(conn)
                .await?
                .into_iter()
                .map(|i| (i.id, i))
                .collect()
        };

        Ok(Self {
            banks,
            users,
            invoices,
        })
    }

    /// Builds the labelled view of one cheque.
    pub(crate) fn view(&self, cheque: cheques::Model) -> ChequeView {
        let invoice = cheque.invoice_id.and_then(|id| self.invoices.get(&id));

        ChequeView {
            bank_name: self.banks.get(&cheque.bank_id).cloned(),
            invoice_number: invoice.map(|i| i.invoice_number.clone()),
            invoice_amount: invoice.map(|i| i.amount),
            invoice_balance: invoice.map(|i| i.balance),
            created_by_username: self.users.get(&cheque.created_by).cloned(),
            id: cheque.id,
            cheque_number: cheque.cheque_number,
            beneficiary: cheque.beneficiary,
            amount: cheque.amount,
            due_date: cheque.due_date,
            details: cheque.details,
            status: cheque.status.into(),
            bank_id: cheque.bank_id,
            invoice_id: cheque.invoice_id,
            deducted_amount: cheque.deducted_amount,
            created_by: cheque.created_by,
            created_at: cheque.created_at,
            updated_at: cheque.updated_at,
        }
    }
}
