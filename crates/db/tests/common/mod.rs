//! Shared fixtures for repository tests on in-memory SQLite.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use chequebook_core::auth::{Actor, Role};
use chequebook_core::cheque::ChequeFields;
use chequebook_db::migration::Migrator;
use chequebook_db::{BankRepository, InvoiceRepository, UserRepository};

/// Opens a fresh migrated in-memory database.
///
/// The pool holds exactly one connection so every query sees the same
/// in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Creates a user and returns the matching actor.
pub async fn create_actor(db: &DatabaseConnection, username: &str, role: Role) -> Actor {
    let user = UserRepository::new(db.clone())
        .create(username, "correct-horse-battery", role)
        .await
        .expect("Failed to create user");
    Actor::new(user.id, role)
}

/// Creates a bank and returns its ID.
pub async fn create_bank(db: &DatabaseConnection, name: &str) -> Uuid {
    BankRepository::new(db.clone())
        .create(name)
        .await
        .expect("Failed to create bank")
        .id
}

/// Creates an invoice and returns its ID.
pub async fn create_invoice(db: &DatabaseConnection, number: &str, amount: Decimal) -> Uuid {
    InvoiceRepository::new(db.clone())
        .create(number, amount)
        .await
        .expect("Failed to create invoice")
        .id
}

/// Valid cheque fields for the given bank and invoice.
pub fn cheque_fields(bank_id: Uuid, invoice_id: Option<Uuid>, amount: Decimal) -> ChequeFields {
    ChequeFields {
        cheque_number: "000123".to_string(),
        beneficiary: "ACME Supplies".to_string(),
        amount,
        due_date: NaiveDate::from_ymd_opt(2026, 11, 30).expect("valid date"),
        details: String::new(),
        bank_id,
        invoice_id,
    }
}
