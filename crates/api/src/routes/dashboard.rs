//! Dashboard route.

use axum::{Json, Router, extract::State, routing::get};

use crate::{AppState, error::ApiError, middleware::AuthUser};
use chequebook_db::{DashboardRepository, DashboardSummary};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// GET /dashboard
///
/// Status counts and the most recently created cheques.
async fn get_dashboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = DashboardRepository::new((*state.db).clone())
        .summary()
        .await?;
    Ok(Json(summary))
}
