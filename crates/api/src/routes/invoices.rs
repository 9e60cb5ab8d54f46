//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use chequebook_db::{InvoiceError, InvoiceRepository, entities::invoices};

/// Creates the invoice routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices/{invoice_id}", get(get_invoice))
}

/// Query parameters for listing invoices.
#[derive(Debug, Default, Deserialize)]
pub struct ListInvoicesQuery {
    /// Invoice to include even when fully paid, e.g. the one a cheque
    /// being edited is attached to.
    pub include: Option<Uuid>,
}

/// Response for the invoice picker.
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    /// Open invoices ordered by number.
    pub invoices: Vec<invoices::Model>,
    /// Set when the list could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// GET /invoices
///
/// A read failure yields an empty list with a warning instead of an error.
async fn list_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ListInvoicesQuery>, ApiError>,
) -> Json<InvoiceListResponse> {
    match InvoiceRepository::new((*state.db).clone())
        .list_open(query.include)
        .await
    {
        Ok(invoices) => Json(InvoiceListResponse {
            invoices,
            warning: None,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list invoices");
            Json(InvoiceListResponse {
                invoices: Vec::new(),
                warning: Some("Invoices could not be loaded".to_string()),
            })
        }
    }
}

/// GET /invoices/{invoice_id}
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Path(invoice_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<invoices::Model>, ApiError> {
    let invoice = InvoiceRepository::new((*state.db).clone())
        .find_by_id(invoice_id)
        .await?
        .ok_or(InvoiceError::NotFound(invoice_id))?;
    Ok(Json(invoice))
}
