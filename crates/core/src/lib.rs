//! Core business logic for Chequebook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Roles, the acting identity, and password hashing
//! - `cheque` - Cheque status lifecycle and its invoice balance effects
//! - `reports` - Account statement totals and dashboard counts

pub mod auth;
pub mod cheque;
pub mod reports;
