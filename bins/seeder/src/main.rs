//! Development data seeder for Chequebook.
//!
//! Creates an admin account, a few banks and open invoices, then prints a
//! bearer token for the admin. Existing rows are left alone, so the seeder
//! can be run repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use chequebook_core::auth::Role;
use chequebook_db::{BankError, BankRepository, InvoiceError, InvoiceRepository, UserRepository};
use chequebook_shared::{AppConfig, JwtService};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "change-me-admin";

const BANKS: [&str; 3] = ["First National Bank", "Harbor Savings", "Union Credit"];

const INVOICES: [(&str, Decimal); 3] = [
    ("INV-2026-001", dec!(1500.00)),
    ("INV-2026-002", dec!(820.50)),
    ("INV-2026-003", dec!(12000.00)),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = chequebook_db::connect(&config.database.url, 1, 1)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding admin user...");
    let users = UserRepository::new(db.clone());
    let admin = match users.find_by_username(ADMIN_USERNAME).await? {
        Some(existing) => existing,
        None => users
            .create(ADMIN_USERNAME, ADMIN_PASSWORD, Role::Admin)
            .await
            .context("Failed to create admin")?,
    };

    println!("Seeding banks...");
    let banks = BankRepository::new(db.clone());
    for name in BANKS {
        match banks.create(name).await {
            Ok(_) | Err(BankError::DuplicateName(_)) => {}
            Err(e) => return Err(e).context("Failed to create bank"),
        }
    }

    println!("Seeding invoices...");
    let invoices = InvoiceRepository::new(db);
    for (number, amount) in INVOICES {
        match invoices.create(number, amount).await {
            Ok(_) | Err(InvoiceError::DuplicateNumber(_)) => {}
            Err(e) => return Err(e).context("Failed to create invoice"),
        }
    }

    let jwt_service = JwtService::new(config.jwt_config());
    let token = jwt_service
        .generate_access_token(admin.id, Role::Admin.as_str())
        .context("Failed to issue token")?;

    println!("Seeding complete!");
    println!("Admin user: {ADMIN_USERNAME} / {ADMIN_PASSWORD}");
    println!("Bearer token: {token}");
    Ok(())
}
