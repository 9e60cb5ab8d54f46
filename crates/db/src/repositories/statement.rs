//! Account statement repository.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use chequebook_core::cheque::ChequeStatus;
use chequebook_core::reports::{ReportService, StatementFilter, StatementTotals};

use crate::entities::{cheque_history, cheques, sea_orm_active_enums};

use super::views::{ChequeView, Labels};

/// One statement line.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    /// The cheque with its labels.
    #[serde(flatten)]
    pub cheque: ChequeView,
    /// Number of history entries recorded for the cheque.
    pub history_count: u64,
}

/// Account statement: filtered cheques and their totals.
#[derive(Debug, Clone, Serialize)]
pub struct AccountStatement {
    /// Filter the statement was built with.
    pub filter: StatementFilter,
    /// Lines, newest first.
    pub rows: Vec<StatementRow>,
    /// Totals per status bucket.
    pub totals: StatementTotals,
}

/// Statement repository.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the account statement for a resolved filter.
    ///
    /// Cheques are selected by creation time within the filter's whole UTC
    /// days, optionally narrowed by bank and status.
    pub async fn account_statement(
        &self,
        filter: &StatementFilter,
    ) -> Result<AccountStatement, DbErr> {
        let mut query = cheques::Entity::find()
            .filter(cheques::Column::CreatedAt.gte(filter.period.start().fixed_offset()))
            .filter(cheques::Column::CreatedAt.lt(filter.period.end_exclusive().fixed_offset()));

        if let Some(bank_id) = filter.bank_id {
            query = query.filter(cheques::Column::BankId.eq(bank_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                cheques::Column::Status.eq(sea_orm_active_enums::ChequeStatus::from(status)),
            );
        }

        let cheques = query
            .order_by_desc(cheques::Column::CreatedAt)
            .order_by_desc(cheques::Column::Id)
            .all(&self.db)
            .await?;

        let labels = Labels::load(&self.db, &cheques).await?;
        let history_counts = self.history_counts(&cheques).await?;

        let totals = ReportService::compute_totals(
            cheques
                .iter()
                .map(|c| (ChequeStatus::from(c.status), c.amount)),
        );

        let rows = cheques
            .into_iter()
            .map(|cheque| StatementRow {
                history_count: history_counts.get(&cheque.id).copied().unwrap_or(0),
                cheque: labels.view(cheque),
            })
            .collect();

        tracing::debug!(
            from = %filter.period.from,
            to = %filter.period.to,
            total = %totals.total,
            "Account statement built"
        );

        Ok(AccountStatement {
            filter: *filter,
            rows,
            totals,
        })
    }

    async fn history_counts(&self, rows: &[cheques::Model]) -> Result<HashMap<Uuid, u64>, DbErr> {
        if rows.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(Uuid, i64)> = cheque_history::Entity::find()
            .select_only()
            .column(cheque_history::Column::ChequeId)
            .column_as(Expr::col(cheque_history::Column::Id).count(), "entry_count")
            .filter(cheque_history::Column::ChequeId.is_in(rows.iter().map(|c| c.id)))
            .group_by(cheque_history::Column::ChequeId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(id, n)| (id, u64::try_from(n).unwrap_or(0)))
            .collect())
    }
}
