//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - User role definitions
//! - The `Actor` value every core operation receives

mod password;

pub use password::{PasswordError, hash_password};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cheque::ChequeStatus;

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages banks and users, may edit cheques in any status.
    Admin,
    /// Registers cheques and edits them while still `created`.
    User,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Returns true if this role can manage banks and users.
    #[must_use]
    pub const fn can_manage_reference_data(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role may edit a cheque currently in `status`.
    #[must_use]
    pub const fn can_edit_cheque(&self, status: ChequeStatus) -> bool {
        match self {
            Self::Admin => true,
            Self::User => matches!(status, ChequeStatus::Created),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity performing an operation.
///
/// Resolved once at the request boundary and passed explicitly into every
/// core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID.
    pub user_id: Uuid,
    /// User role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}
