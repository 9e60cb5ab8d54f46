//! User repository for account administration.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use chequebook_core::auth::{PasswordError, Role, hash_password};

use crate::entities::{cheques, sea_orm_active_enums::UserRole, users};

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 100;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Username is blank or too long.
    #[error("Username must be 1 to {MAX_USERNAME_LEN} characters")]
    InvalidUsername,

    /// Username already taken.
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// An administrator tried to delete their own account.
    #[error("You cannot delete your own account")]
    SelfDeletion,

    /// Password rejected or hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl UserError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidUsername | Self::Password(PasswordError::TooShort) => 400,
            Self::UsernameTaken(_) | Self::SelfDeletion => 409,
            Self::Password(PasswordError::HashError(_)) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "USER_NOT_FOUND",
            Self::InvalidUsername | Self::Password(PasswordError::TooShort) => "VALIDATION_ERROR",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::SelfDeletion => "SELF_DELETION",
            Self::Password(PasswordError::HashError(_)) => "INTERNAL_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// User with the number of cheques they registered.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithCount {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: Role,
    /// Created at timestamp.
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    /// Number of cheques created by the user.
    pub cheque_count: u64,
}

/// Fields for updating a user.
#[derive(Debug, Clone)]
pub struct UpdateUserInput {
    /// New username.
    pub username: String,
    /// New role.
    pub role: Role,
    /// New password; `None` keeps the current one.
    pub password: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Lists users alphabetically with their created-cheque counts.
    pub async fn list_with_counts(&self) -> Result<Vec<UserWithCount>, DbErr> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await?;

        let counts: HashMap<Uuid, i64> = cheques::Entity::find()
            .select_only()
            .column(cheques::Column::CreatedBy)
            .column_as(Expr::col(cheques::Column::Id).count(), "cheque_count")
            .group_by(cheques::Column::CreatedBy)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(users
            .into_iter()
            .map(|user| UserWithCount {
                cheque_count: counts
                    .get(&user.id)
                    .map_or(0, |n| u64::try_from(*n).unwrap_or(0)),
                id: user.id,
                username: user.username,
                role: user.role.into(),
                created_at: user.created_at,
            })
            .collect())
    }

    /// Creates a user with an Argon2id password hash.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<users::Model, UserError> {
        let username = normalize_username(username)?;
        self.ensure_username_free(&username, None).await?;
        let password_hash = hash_password(password)?;

        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(username),
            password_hash: Set(password_hash),
            role: Set(UserRole::from(role)),
            created_at: Set(chrono::Utc::now().into()),
        };

        let user = user.insert(&self.db).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Updates username, role and optionally the password.
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<users::Model, UserError> {
        let username = normalize_username(&input.username)?;
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound(id))?;
        self.ensure_username_free(&username, Some(id)).await?;

        let mut active: users::ActiveModel = user.into();
        active.username = Set(username);
        active.role = Set(UserRole::from(input.role));
        if let Some(password) = input.password.as_deref().filter(|p| !p.is_empty()) {
            active.password_hash = Set(hash_password(password)?);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a user other than the acting one.
    ///
    /// Cheques and history entries keep the deleted user's ID.
    pub async fn delete(&self, id: Uuid, acting_user_id: Uuid) -> Result<(), UserError> {
        if id == acting_user_id {
            return Err(UserError::SelfDeletion);
        }
        if self.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }

        users::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(user_id = %id, deleted_by = %acting_user_id, "User deleted");
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str, except: Option<Uuid>) -> Result<(), UserError> {
        let mut query = users::Entity::find().filter(users::Column::Username.eq(username));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(UserError::UsernameTaken(username.to_string()));
        }
        Ok(())
    }
}

fn normalize_username(username: &str) -> Result<String, UserError> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(UserError::InvalidUsername);
    }
    Ok(username.to_string())
}
