//! `SeaORM` active enums stored as short strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use chequebook_core::auth::Role;
use chequebook_core::cheque::ChequeStatus as CoreChequeStatus;

/// Cheque status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Issued and not yet presented.
    #[sea_orm(string_value = "created")]
    Created,
    /// Deposited.
    #[sea_orm(string_value = "deposited")]
    Deposited,
    /// Returned by the bank.
    #[sea_orm(string_value = "returned")]
    Returned,
    /// Cancelled.
    #[sea_orm(string_value = "voided")]
    Voided,
}

impl From<CoreChequeStatus> for ChequeStatus {
    fn from(status: CoreChequeStatus) -> Self {
        match status {
            CoreChequeStatus::Created => Self::Created,
            CoreChequeStatus::Deposited => Self::Deposited,
            CoreChequeStatus::Returned => Self::Returned,
            CoreChequeStatus::Voided => Self::Voided,
        }
    }
}

impl From<ChequeStatus> for CoreChequeStatus {
    fn from(status: ChequeStatus) -> Self {
        match status {
            ChequeStatus::Created => Self::Created,
            ChequeStatus::Deposited => Self::Deposited,
            ChequeStatus::Returned => Self::Returned,
            ChequeStatus::Voided => Self::Voided,
        }
    }
}

/// User role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Regular user.
    #[sea_orm(string_value = "user")]
    User,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::User,
        }
    }
}
