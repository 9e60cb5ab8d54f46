//! Bank routes.
//!
//! Listing is open to every authenticated user; changes require an admin.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use chequebook_db::{BankRepository, BankWithCount, entities::banks};

/// Creates the bank routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banks", get(list_banks).post(create_bank))
        .route("/banks/{bank_id}", put(rename_bank).delete(delete_bank))
}

/// Request body for creating or renaming a bank.
#[derive(Debug, Deserialize)]
pub struct BankRequest {
    /// Bank name.
    pub name: String,
}

/// Response for the bank list.
#[derive(Debug, Serialize)]
pub struct BankListResponse {
    /// Banks ordered by name.
    pub banks: Vec<BankWithCount>,
    /// Set when the list could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn repository(state: &AppState) -> BankRepository {
    BankRepository::new((*state.db).clone())
}

/// GET /banks
async fn list_banks(State(state): State<AppState>, _auth: AuthUser) -> Json<BankListResponse> {
    match repository(&state).list_with_counts().await {
        Ok(banks) => Json(BankListResponse {
            banks,
            warning: None,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list banks");
            Json(BankListResponse {
                banks: Vec::new(),
                warning: Some("Banks could not be loaded".to_string()),
            })
        }
    }
}

/// POST /banks
async fn create_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(request), _): WithRejection<Json<BankRequest>, ApiError>,
) -> Result<(StatusCode, Json<banks::Model>), ApiError> {
    auth.require_admin()?;
    let bank = repository(&state).create(&request.name).await?;
    Ok((StatusCode::CREATED, Json(bank)))
}

/// PUT /banks/{bank_id}
async fn rename_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(bank_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<BankRequest>, ApiError>,
) -> Result<Json<banks::Model>, ApiError> {
    auth.require_admin()?;
    Ok(Json(repository(&state).rename(bank_id, &request.name).await?))
}

/// DELETE /banks/{bank_id}
///
/// Refused while any cheque is drawn on the bank.
async fn delete_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(bank_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let actor = auth.require_admin()?;
    repository(&state).delete(bank_id).await?;
    tracing::info!(bank_id = %bank_id, deleted_by = %actor.user_id, "Bank deleted");
    Ok(StatusCode::NO_CONTENT)
}
