//! User administration routes. All of them require the admin role.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::{DateTime, FixedOffset};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use chequebook_core::auth::Role;
use chequebook_db::{UpdateUserInput, UserRepository, UserWithCount, entities::users};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", put(update_user).delete(delete_user))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Username.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Role: admin or user.
    pub role: Role,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// Username.
    pub username: String,
    /// Role: admin or user.
    pub role: Role,
    /// New password; absent or empty keeps the current one.
    pub password: Option<String>,
}

/// A user without credentials.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.into(),
            created_at: user.created_at,
        }
    }
}

fn repository(state: &AppState) -> UserRepository {
    UserRepository::new((*state.db).clone())
}

/// GET /users
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserWithCount>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(repository(&state).list_with_counts().await?))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    auth.require_admin()?;
    let user = repository(&state)
        .create(&request.username, &request.password, request.role)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /users/{user_id}
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    auth.require_admin()?;
    let user = repository(&state)
        .update(
            user_id,
            UpdateUserInput {
                username: request.username,
                role: request.role,
                password: request.password,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /users/{user_id}
///
/// An admin cannot delete their own account.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let actor = auth.require_admin()?;
    repository(&state).delete(user_id, actor.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
