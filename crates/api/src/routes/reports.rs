//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use chequebook_core::reports::ReportService;
use chequebook_db::{AccountStatement, StatementRepository};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/account-statement", get(get_account_statement))
}

/// Query parameters for the account statement.
///
/// Blank values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct StatementQuery {
    /// First day, `YYYY-MM-DD`. Defaults to the first day of the current month.
    pub from: Option<String>,
    /// Last day, inclusive. Defaults to the last day of the current month.
    pub to: Option<String>,
    /// Restrict to one bank.
    pub bank_id: Option<String>,
    /// Restrict to one status.
    pub status: Option<String>,
}

/// GET /reports/account-statement
async fn get_account_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<StatementQuery>, ApiError>,
) -> Result<Json<AccountStatement>, ApiError> {
    let filter = ReportService::parse_filter(
        query.from.as_deref(),
        query.to.as_deref(),
        query.bank_id.as_deref(),
        query.status.as_deref(),
        Utc::now().date_naive(),
    )?;

    let statement = StatementRepository::new((*state.db).clone())
        .account_statement(&filter)
        .await?;

    tracing::debug!(
        from = %filter.period.from,
        to = %filter.period.to,
        rows = statement.rows.len(),
        "Account statement generated"
    );
    Ok(Json(statement))
}
