//! Bank repository for reference data administration.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{banks, cheques};

/// Maximum length of a bank name.
pub const MAX_BANK_NAME_LEN: usize = 255;

/// Errors that can occur during bank operations.
#[derive(Debug, Error)]
pub enum BankError {
    /// Bank not found.
    #[error("Bank not found: {0}")]
    NotFound(Uuid),

    /// Name is blank or too long.
    #[error("Bank name must be 1 to {MAX_BANK_NAME_LEN} characters")]
    InvalidName,

    /// Another bank already has this name.
    #[error("Bank name already exists: {0}")]
    DuplicateName(String),

    /// Cheques still reference the bank.
    #[error("Bank is referenced by {0} cheque(s) and cannot be deleted")]
    InUse(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BankError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidName => 400,
            Self::DuplicateName(_) | Self::InUse(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BANK_NOT_FOUND",
            Self::InvalidName => "VALIDATION_ERROR",
            Self::DuplicateName(_) => "DUPLICATE_BANK",
            Self::InUse(_) => "BANK_IN_USE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Bank with the number of cheques drawn on it.
#[derive(Debug, Clone, Serialize)]
pub struct BankWithCount {
    /// Bank ID.
    pub id: Uuid,
    /// Bank name.
    pub name: String,
    /// Number of cheques referencing the bank.
    pub cheque_count: u64,
}

/// Bank repository.
#[derive(Debug, Clone)]
pub struct BankRepository {
    db: DatabaseConnection,
}

impl BankRepository {
    /// Creates a new bank repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists banks alphabetically with their cheque counts.
    pub async fn list_with_counts(&self) -> Result<Vec<BankWithCount>, DbErr> {
        let banks = banks::Entity::find()
            .order_by_asc(banks::Column::Name)
            .all(&self.db)
            .await?;

        let counts: HashMap<Uuid, i64> = cheques::Entity::find()
            .select_only()
            .column(cheques::Column::BankId)
            .column_as(Expr::col(cheques::Column::Id).count(), "cheque_count")
            .group_by(cheques::Column::BankId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(banks
            .into_iter()
            .map(|bank| BankWithCount {
                cheque_count: counts
                    .get(&bank.id)
                    .map_or(0, |n| u64::try_from(*n).unwrap_or(0)),
                id: bank.id,
                name: bank.name,
            })
            .collect())
    }

    /// Finds a bank by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<banks::Model>, DbErr> {
        banks::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a bank.
    pub async fn create(&self, name: &str) -> Result<banks::Model, BankError> {
        let name = normalize_name(name)?;
        self.ensure_name_free(&name, None).await?;

        let bank = banks::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            created_at: Set(chrono::Utc::now().into()),
        };

        let bank = bank.insert(&self.db).await?;
        tracing::info!(bank_id = %bank.id, name = %bank.name, "Bank created");
        Ok(bank)
    }

    /// Renames a bank.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<banks::Model, BankError> {
        let name = normalize_name(name)?;
        let bank = self.find_by_id(id).await?.ok_or(BankError::NotFound(id))?;
        self.ensure_name_free(&name, Some(id)).await?;

        let mut active: banks::ActiveModel = bank.into();
        active.name = Set(name);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a bank that no cheque references.
    pub async fn delete(&self, id: Uuid) -> Result<(), BankError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(BankError::NotFound(id));
        }

        let in_use = cheques::Entity::find()
            .filter(cheques::Column::BankId.eq(id))
            .count(&self.db)
            .await?;
        if in_use > 0 {
            return Err(BankError::InUse(in_use));
        }

        banks::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(bank_id = %id, "Bank deleted");
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<(), BankError> {
        let mut query = banks::Entity::find().filter(banks::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(banks::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(BankError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

fn normalize_name(name: &str) -> Result<String, BankError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_BANK_NAME_LEN {
        return Err(BankError::InvalidName);
    }
    Ok(name.to_string())
}
