//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use chequebook_core::auth::{Actor, Role};
use chequebook_shared::{AppError, Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are stored in the request extensions for `AuthUser`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized(
            "UNAUTHORIZED",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("TOKEN_EXPIRED", "Token has expired"),
        Err(_) => unauthorized("INVALID_TOKEN", "Invalid or malformed token"),
    }
}

/// Extractor for the authenticated user's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Resolves the acting identity passed to core operations.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the token carries an unknown role.
    pub fn actor(&self) -> Result<Actor, ApiError> {
        let role = Role::parse(&self.0.role)
            .ok_or_else(|| ApiError::from(AppError::Unauthorized("Unknown role in token".into())))?;
        Ok(Actor::new(self.user_id(), role))
    }

    /// Resolves the actor and checks it may manage banks and users.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin users.
    pub fn require_admin(&self) -> Result<Actor, ApiError> {
        let actor = self.actor()?;
        if actor.role.can_manage_reference_data() {
            Ok(actor)
        } else {
            Err(ApiError::forbidden("Administrator role required"))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("UNAUTHORIZED", "Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims::new(
            Uuid::from_u128(5),
            role,
            Utc::now() + Duration::minutes(5),
        ))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_actor_from_claims() {
        let actor = auth_user("user").actor().unwrap();
        assert_eq!(actor.user_id, Uuid::from_u128(5));
        assert_eq!(actor.role, Role::User);

        let err = auth_user("owner").actor().unwrap_err();
        assert_eq!(err.error.status_code(), 401);
    }

    #[test]
    fn test_require_admin() {
        assert!(auth_user("admin").require_admin().is_ok());
        assert_eq!(
            auth_user("user").require_admin().unwrap_err().error.status_code(),
            403
        );
    }
}
