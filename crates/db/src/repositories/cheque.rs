//! Cheque repository: creation, status updates and the history read path.
//!
//! Every mutation runs in one database transaction. Invoice balance effects
//! are planned by `ChequeLifecycle::plan_update` and applied here in order,
//! together with the field update and the history entry.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use chequebook_core::auth::Actor;
use chequebook_core::cheque::{
    ChequeError, ChequeFields, ChequeLifecycle, ChequeSnapshot, ChequeStatus, InvoiceDeduction,
    StatusChange,
};

use crate::entities::{cheque_history, cheques, users};

use super::invoice::adjust_balance;
use super::views::{ChequeView, HistoryEntry, Labels};

/// A cheque with its labels and full history.
#[derive(Debug, Clone, Serialize)]
pub struct ChequeDetail {
    /// The cheque.
    #[serde(flatten)]
    pub cheque: ChequeView,
    /// History, most recent first.
    pub history: Vec<HistoryEntry>,
}

/// Cheque repository.
#[derive(Debug, Clone)]
pub struct ChequeRepository {
    db: DatabaseConnection,
}

impl ChequeRepository {
    /// Creates a new cheque repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a cheque in status `created` and writes its creation entry.
    ///
    /// No invoice balance changes on creation.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::Database` if the store rejects the insert, for
    /// example because the bank or invoice does not exist.
    pub async fn create(
        &self,
        fields: &ChequeFields,
        actor: &Actor,
    ) -> Result<cheques::Model, ChequeError> {
        let now = Utc::now().into();
        let id = Uuid::now_v7();

        let txn = self.db.begin().await.map_err(db_err)?;

        let cheque = cheques::ActiveModel {
            id: Set(id),
            cheque_number: Set(fields.cheque_number.clone()),
            beneficiary: Set(fields.beneficiary.clone()),
            amount: Set(fields.amount),
            due_date: Set(fields.due_date),
            details: Set(fields.details.clone()),
            bank_id: Set(fields.bank_id),
            invoice_id: Set(fields.invoice_id),
            status: Set(ChequeLifecycle::INITIAL_STATUS.into()),
            deducted_invoice_id: Set(None),
            deducted_amount: Set(None),
            created_by: Set(actor.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        history_row(id, ChequeLifecycle::creation_entry(actor.user_id))
            .insert(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            cheque_id = %id,
            created_by = %actor.user_id,
            amount = %fields.amount,
            "Cheque created"
        );
        Ok(cheque)
    }

    /// Saves new field values and, optionally, a new status.
    ///
    /// The actor's right to edit is checked against the status read inside
    /// the transaction. `requested` of `None` keeps the current status.
    ///
    /// # Errors
    ///
    /// - `ChequeError::ChequeNotFound` if the cheque does not exist
    /// - `ChequeError::EditForbidden` if the actor may not edit it
    /// - `ChequeError::Database` if any write fails; nothing is persisted
    pub async fn update(
        &self,
        id: Uuid,
        fields: &ChequeFields,
        requested: Option<ChequeStatus>,
        actor: &Actor,
    ) -> Result<cheques::Model, ChequeError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Row lock: a concurrent update of the same cheque waits here and then
        // plans against the committed status and deduction.
        let cheque = cheques::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ChequeError::ChequeNotFound(id))?;

        let snapshot = snapshot_of(&cheque);
        ChequeLifecycle::authorize_edit(actor, snapshot.status)?;
        let plan = ChequeLifecycle::plan_update(&snapshot, fields, requested, actor.user_id)?;

        for effect in &plan.effects {
            adjust_balance(&txn, effect.invoice_id(), effect.delta())
                .await
                .map_err(db_err)?;
        }

        let mut active: cheques::ActiveModel = cheque.into();
        active.cheque_number = Set(fields.cheque_number.clone());
        active.beneficiary = Set(fields.beneficiary.clone());
        active.amount = Set(fields.amount);
        active.due_date = Set(fields.due_date);
        active.details = Set(fields.details.clone());
        active.bank_id = Set(fields.bank_id);
        active.invoice_id = Set(fields.invoice_id);
        active.status = Set(plan.status.into());
        active.deducted_invoice_id = Set(plan.deduction.map(|d| d.invoice_id));
        active.deducted_amount = Set(plan.deduction.map(|d| d.amount));
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await.map_err(db_err)?;

        if let Some(change) = plan.history {
            history_row(id, change).insert(&txn).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            cheque_id = %id,
            from = %snapshot.status,
            to = %plan.status,
            balance_effects = plan.effects.len(),
            changed_by = %actor.user_id,
            "Cheque updated"
        );
        Ok(updated)
    }

    /// Finds a cheque by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<cheques::Model>, DbErr> {
        cheques::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists the most recently created cheques with their labels, newest first.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<ChequeView>, DbErr> {
        let rows = cheques::Entity::find()
            .order_by_desc(cheques::Column::CreatedAt)
            .order_by_desc(cheques::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        let labels = Labels::load(&self.db, &rows).await?;
        Ok(rows.into_iter().map(|c| labels.view(c)).collect())
    }

    /// Loads a cheque with bank, invoice and creator labels and its history.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::ChequeNotFound` if the cheque does not exist.
    pub async fn detail(&self, id: Uuid) -> Result<ChequeDetail, ChequeError> {
        let cheque = self
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(ChequeError::ChequeNotFound(id))?;

        let labels = Labels::load(&self.db, std::slice::from_ref(&cheque))
            .await
            .map_err(db_err)?;
        let history = load_history(&self.db, id).await.map_err(db_err)?;

        Ok(ChequeDetail {
            cheque: labels.view(cheque),
            history,
        })
    }

    /// Lists a cheque's history, most recent first.
    ///
    /// Entries with the same timestamp are ordered by their time-ordered ID.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::ChequeNotFound` if the cheque does not exist.
    pub async fn history(&self, id: Uuid) -> Result<Vec<HistoryEntry>, ChequeError> {
        if self.find_by_id(id).await.map_err(db_err)?.is_none() {
            return Err(ChequeError::ChequeNotFound(id));
        }
        load_history(&self.db, id).await.map_err(db_err)
    }
}

/// Reads the status and the deduction in force from a stored cheque.
fn snapshot_of(cheque: &cheques::Model) -> ChequeSnapshot {
    let deduction = match (cheque.deducted_invoice_id, cheque.deducted_amount) {
        (Some(invoice_id), Some(amount)) => Some(InvoiceDeduction { invoice_id, amount }),
        _ => None,
    };

    ChequeSnapshot {
        status: cheque.status.into(),
        deduction,
    }
}

fn history_row(cheque_id: Uuid, change: StatusChange) -> cheque_history::ActiveModel {
    cheque_history::ActiveModel {
        id: Set(Uuid::now_v7()),
        cheque_id: Set(cheque_id),
        previous_status: Set(change.previous.map(Into::into)),
        new_status: Set(change.new.into()),
        changed_by: Set(change.changed_by),
        changed_at: Set(Utc::now().into()),
    }
}

async fn load_history<C: ConnectionTrait>(
    conn: &C,
    cheque_id: Uuid,
) -> Result<Vec<HistoryEntry>, DbErr> {
    let rows = cheque_history::Entity::find()
        .filter(cheque_history::Column::ChequeId.eq(cheque_id))
        .order_by_desc(cheque_history::Column::ChangedAt)
        .order_by_desc(cheque_history::Column::Id)
        .find_also_related(users::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(entry, user)| HistoryEntry::from_row(entry, user))
        .collect())
}

#[allow(clippy::needless_pass_by_value)]
fn db_err(e: DbErr) -> ChequeError {
    ChequeError::Database(e.to_string())
}
