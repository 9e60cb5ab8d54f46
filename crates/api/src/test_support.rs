//! Router harness for handler tests on in-memory SQLite.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};
use chequebook_core::auth::Role;
use chequebook_core::cheque::ChequeStatus;
use chequebook_db::migration::{Migrator, MigratorTrait};
use chequebook_db::{BankRepository, InvoiceRepository, UserRepository};
use chequebook_shared::{JwtConfig, JwtService};

/// Bearer token issued for a test user.
pub struct Token(String);

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.expect("open database");
        Migrator::up(&db, None).await.expect("migrate");

        let jwt_service = JwtService::new(JwtConfig {
            secret: "test-secret-at-least-32-bytes-long!".to_string(),
            access_token_expires_secs: 900,
        });

        Self {
            state: AppState {
                db: Arc::new(db),
                jwt_service: Arc::new(jwt_service),
            },
        }
    }

    /// Creates a user and returns a bearer token for them.
    pub async fn token_for(&self, username: &str, role: Role) -> Token {
        let user = UserRepository::new((*self.state.db).clone())
            .create(username, "correct-horse-battery", role)
            .await
            .expect("create user");
        let token = self
            .state
            .jwt_service
            .generate_access_token(user.id, role.as_str())
            .expect("issue token");
        Token(token)
    }

    pub async fn user_id(&self, username: &str) -> Uuid {
        UserRepository::new((*self.state.db).clone())
            .find_by_username(username)
            .await
            .expect("query user")
            .expect("user exists")
            .id
    }

    pub async fn bank(&self, name: &str) -> Uuid {
        BankRepository::new((*self.state.db).clone())
            .create(name)
            .await
            .expect("create bank")
            .id
    }

    pub async fn invoice(&self, number: &str, amount: &str) -> Uuid {
        InvoiceRepository::new((*self.state.db).clone())
            .create(number, amount.parse().expect("amount"))
            .await
            .expect("create invoice")
            .id
    }

    /// Registers a cheque through the API and optionally moves it to `status`.
    pub async fn cheque(
        &self,
        token: &Token,
        bank: Uuid,
        amount: &str,
        status: Option<ChequeStatus>,
    ) -> Uuid {
        let mut form = json!({
            "cheque_number": "000001",
            "beneficiary": "Payee",
            "amount": amount,
            "due_date": "2026-12-31",
            "bank_id": bank.to_string(),
        });
        let (code, created) = self.send("POST", "/api/v1/cheques", Some(token), form.clone()).await;
        assert_eq!(code, StatusCode::CREATED, "{created}");
        let id: Uuid = created["id"].as_str().expect("id").parse().expect("uuid");

        if let Some(status) = status {
            form["status"] = json!(status.as_str());
            let (code, body) = self
                .send("PUT", &format!("/api/v1/cheques/{id}"), Some(token), form)
                .await;
            assert_eq!(code, StatusCode::OK, "{body}");
        }
        id
    }

    pub async fn get(&self, path: &str, token: Option<&Token>) -> (StatusCode, Value) {
        self.send("GET", path, token, Value::Null).await
    }

    /// Sends a request; a `Null` body is sent empty.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        token: Option<&Token>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token.0));
        }
        let request = if body.is_null() {
            builder.body(Body::empty())
        } else {
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
        }
        .expect("build request");

        let response = create_router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

/// Reads a decimal serialized as a string.
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .expect("decimal")
}
