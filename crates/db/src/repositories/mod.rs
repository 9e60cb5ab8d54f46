//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod bank;
pub mod cheque;
pub mod dashboard;
pub mod invoice;
pub mod statement;
pub mod user;
pub mod views;

pub use bank::{BankError, BankRepository, BankWithCount};
pub use cheque::{ChequeDetail, ChequeRepository};
pub use dashboard::{DashboardRepository, DashboardSummary};
pub use invoice::{InvoiceError, InvoiceRepository};
pub use statement::{AccountStatement, StatementRepository, StatementRow};
pub use user::{UpdateUserInput, UserError, UserRepository, UserWithCount};
pub use views::{ChequeView, HistoryEntry};
