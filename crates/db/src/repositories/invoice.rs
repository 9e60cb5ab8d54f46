//! Invoice repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::invoices;

/// Errors that can occur during invoice operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Invoice number already exists.
    #[error("Invoice number already exists: {0}")]
    DuplicateNumber(String),

    /// Invoice amount is not positive.
    #[error("Invoice amount must be positive")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl InvoiceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateNumber(_) => 409,
            Self::NonPositiveAmount => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::DuplicateNumber(_) => "DUPLICATE_INVOICE",
            Self::NonPositiveAmount => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists invoices with an outstanding balance, ordered by number.
    ///
    /// `include` adds one invoice regardless of its balance, so a cheque
    /// being edited can still show the invoice it is attached to.
    pub async fn list_open(&self, include: Option<Uuid>) -> Result<Vec<invoices::Model>, DbErr> {
        let mut condition = Condition::any().add(invoices::Column::Balance.gt(Decimal::ZERO));
        if let Some(id) = include {
            condition = condition.add(invoices::Column::Id.eq(id));
        }

        invoices::Entity::find()
            .filter(condition)
            .order_by_asc(invoices::Column::InvoiceNumber)
            .all(&self.db)
            .await
    }

    /// Finds an invoice by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        invoices::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates an invoice whose balance starts at its full amount.
    pub async fn create(
        &self,
        invoice_number: &str,
        amount: Decimal,
    ) -> Result<invoices::Model, InvoiceError> {
        if amount <= Decimal::ZERO {
            return Err(InvoiceError::NonPositiveAmount);
        }

        let invoice_number = invoice_number.trim();
        let exists = invoices::Entity::find()
            .filter(invoices::Column::InvoiceNumber.eq(invoice_number))
            .one(&self.db)
            .await?
            .is_some();
        if exists {
            return Err(InvoiceError::DuplicateNumber(invoice_number.to_string()));
        }

        let invoice = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_number: Set(invoice_number.to_string()),
            amount: Set(amount),
            balance: Set(amount),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(invoice.insert(&self.db).await?)
    }
}

/// Adds `delta` to an invoice balance in a single UPDATE statement.
///
/// Runs on whatever connection or transaction it is given. Concurrent calls
/// against the same invoice cannot lose updates.
pub(crate) async fn adjust_balance<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
    delta: Decimal,
) -> Result<(), DbErr> {
    let result = invoices::Entity::update_many()
        .col_expr(
            invoices::Column::Balance,
            Expr::col(invoices::Column::Balance).add(delta),
        )
        .filter(invoices::Column::Id.eq(invoice_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotUpdated);
    }

    tracing::debug!(%invoice_id, %delta, "Invoice balance adjusted");
    Ok(())
}
