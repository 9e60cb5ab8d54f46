//! Cheque routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use chequebook_core::cheque::{ChequeForm, UpdateChequeForm};
use chequebook_db::{ChequeDetail, ChequeRepository, ChequeView, HistoryEntry};

/// Maximum number of cheques returned by the listing.
pub const CHEQUE_LIST_LIMIT: u64 = 100;

/// Creates the cheque routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cheques", get(list_cheques).post(create_cheque))
        .route("/cheques/{cheque_id}", get(get_cheque).put(update_cheque))
        .route("/cheques/{cheque_id}/history", get(get_history))
}

fn repository(state: &AppState) -> ChequeRepository {
    ChequeRepository::new((*state.db).clone())
}

/// GET /cheques
///
/// The latest cheques, newest first.
async fn list_cheques(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ChequeView>>, ApiError> {
    Ok(Json(repository(&state).list_recent(CHEQUE_LIST_LIMIT).await?))
}

/// POST /cheques
///
/// Registers a cheque in status `created` and returns its detail.
async fn create_cheque(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(form), _): WithRejection<Json<ChequeForm>, ApiError>,
) -> Result<(StatusCode, Json<ChequeDetail>), ApiError> {
    let actor = auth.actor()?;
    let fields = form.validate()?;

    let repo = repository(&state);
    let cheque = repo.create(&fields, &actor).await?;
    let detail = repo.detail(cheque.id).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /cheques/{cheque_id}
async fn get_cheque(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Path(cheque_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<ChequeDetail>, ApiError> {
    Ok(Json(repository(&state).detail(cheque_id).await?))
}

/// PUT /cheques/{cheque_id}
///
/// Saves the fields and, if a different status is given, moves the cheque
/// to it. Users may only edit cheques that are still `created`.
async fn update_cheque(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(cheque_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(form), _): WithRejection<Json<UpdateChequeForm>, ApiError>,
) -> Result<Json<ChequeDetail>, ApiError> {
    let actor = auth.actor()?;
    let (fields, status) = form.validate()?;

    let repo = repository(&state);
    repo.update(cheque_id, &fields, status, &actor).await?;

    Ok(Json(repo.detail(cheque_id).await?))
}

/// GET /cheques/{cheque_id}/history
async fn get_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Path(cheque_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(repository(&state).history(cheque_id).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{TestApp, decimal};
    use chequebook_core::auth::Role;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_requires_token() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/v1/cheques/00000000-0000-0000-0000-000000000000", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_and_deposit_cheque() {
        let app = TestApp::new().await;
        let admin = app.token_for("admin", Role::Admin).await;
        let bank = app.bank("First National").await;
        let invoice = app.invoice("INV-001", "1000").await;

        let (status, created) = app
            .send(
                "POST",
                "/api/v1/cheques",
                Some(&admin),
                json!({
                    "cheque_number": "000123",
                    "beneficiary": "ACME Supplies",
                    "amount": "250.50",
                    "due_date": "2026-11-30",
                    "bank_id": bank.to_string(),
                    "invoice_id": invoice.to_string(),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "created");
        assert_eq!(created["bank_name"], "First National");
        assert_eq!(created["history"].as_array().unwrap().len(), 1);

        let id = created["id"].as_str().unwrap().to_string();
        let (status, updated) = app
            .send(
                "PUT",
                &format!("/api/v1/cheques/{id}"),
                Some(&admin),
                json!({
                    "cheque_number": "000123",
                    "beneficiary": "ACME Supplies",
                    "amount": "250.50",
                    "due_date": "2026-11-30",
                    "bank_id": bank.to_string(),
                    "invoice_id": invoice.to_string(),
                    "status": "deposited",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "deposited");
        assert_eq!(decimal(&updated["invoice_balance"]), dec!(749.50));

        let (status, history) = app
            .get(&format!("/api/v1/cheques/{id}/history"), Some(&admin))
            .await;
        assert_eq!(status, StatusCode::OK);
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["new_status"], "deposited");
        assert_eq!(history[0]["previous_status"], "created");
    }

    #[tokio::test]
    async fn test_user_cannot_edit_deposited_cheque() {
        let app = TestApp::new().await;
        let admin = app.token_for("admin", Role::Admin).await;
        let user = app.token_for("clerk", Role::User).await;
        let bank = app.bank("First National").await;

        let form = json!({
            "cheque_number": "7",
            "beneficiary": "Payee",
            "amount": "100",
            "due_date": "2026-11-30",
            "bank_id": bank.to_string(),
        });
        let (_, created) = app.send("POST", "/api/v1/cheques", Some(&user), form.clone()).await;
        let path = format!("/api/v1/cheques/{}", created["id"].as_str().unwrap());

        let mut deposit = form.clone();
        deposit["status"] = json!("deposited");
        let (status, _) = app.send("PUT", &path, Some(&admin), deposit).await;
        assert_eq!(status, StatusCode::OK);

        let mut edit = form;
        edit["beneficiary"] = json!("Someone Else");
        let (status, body) = app.send("PUT", &path, Some(&user), edit).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "FORBIDDEN");
        assert_eq!(body["reason"], "EDIT_FORBIDDEN");
    }

    #[tokio::test]
    async fn test_validation_error() {
        let app = TestApp::new().await;
        let user = app.token_for("clerk", Role::User).await;
        let bank = app.bank("First National").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/cheques",
                Some(&user),
                json!({
                    "cheque_number": "7",
                    "beneficiary": "   ",
                    "amount": "100",
                    "due_date": "2026-11-30",
                    "bank_id": bank.to_string(),
                }),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "beneficiary is required");
    }

    #[tokio::test]
    async fn test_list_cheques_newest_first() {
        let app = TestApp::new().await;
        let user = app.token_for("clerk", Role::User).await;
        let bank = app.bank("First National").await;
        let first = app.cheque(&user, bank, "100", None).await;
        let second = app.cheque(&user, bank, "50", None).await;

        let (status, body) = app.get("/api/v1/cheques", Some(&user)).await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], second.to_string());
        assert_eq!(rows[1]["id"], first.to_string());
        assert_eq!(rows[0]["bank_name"], "First National");
    }

    #[tokio::test]
    async fn test_numeric_amount_is_accepted() {
        let app = TestApp::new().await;
        let user = app.token_for("clerk", Role::User).await;
        let bank = app.bank("First National").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/cheques",
                Some(&user),
                json!({
                    "cheque_number": "7",
                    "beneficiary": "Payee",
                    "amount": 100,
                    "due_date": "2026-11-30",
                    "bank_id": bank.to_string(),
                }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(decimal(&body["amount"]), dec!(100));
    }

    #[tokio::test]
    async fn test_malformed_input_is_validation_error() {
        let app = TestApp::new().await;
        let user = app.token_for("clerk", Role::User).await;

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/cheques",
                Some(&user),
                json!({ "cheque_number": ["not", "text"] }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, body) = app.get("/api/v1/cheques/not-a-uuid", Some(&user)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, body) = app
            .get("/api/v1/cheques/not-a-uuid/history", Some(&user))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_cheque_is_not_found() {
        let app = TestApp::new().await;
        let user = app.token_for("clerk", Role::User).await;

        let (status, body) = app
            .get(
                "/api/v1/cheques/0193a5a0-0000-7000-8000-000000000001/history",
                Some(&user),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["reason"], "CHEQUE_NOT_FOUND");
    }
}
