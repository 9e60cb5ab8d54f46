//! Dashboard repository: status counts and recently created cheques.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QuerySelect, sea_query::Expr};
use serde::Serialize;

use chequebook_core::reports::{ReportService, StatusCounts};

use crate::entities::{cheques, sea_orm_active_enums::ChequeStatus};

use super::cheque::ChequeRepository;
use super::views::ChequeView;

/// Number of recent cheques shown on the dashboard.
pub const RECENT_CHEQUES: u64 = 5;

/// Dashboard figures.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Cheque counts per status.
    pub counts: StatusCounts,
    /// Most recently created cheques.
    pub recent: Vec<ChequeView>,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads counts per status and the latest cheques.
    pub async fn summary(&self) -> Result<DashboardSummary, DbErr> {
        Ok(DashboardSummary {
            counts: self.status_counts().await?,
            recent: ChequeRepository::new(self.db.clone())
                .list_recent(RECENT_CHEQUES)
                .await?,
        })
    }

    /// Counts cheques per status.
    pub async fn status_counts(&self) -> Result<StatusCounts, DbErr> {
        let rows: Vec<(ChequeStatus, i64)> = cheques::Entity::find()
            .select_only()
            .column(cheques::Column::Status)
            .column_as(Expr::col(cheques::Column::Id).count(), "cheque_count")
            .group_by(cheques::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ReportService::count_by_status(rows.into_iter().map(
            |(status, count)| (status.into(), u64::try_from(count).unwrap_or(0)),
        )))
    }
}
