//! Shared errors, configuration and token handling for Chequebook.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error taxonomy
//! - Configuration management
//! - Bearer token claims and the JWT service that validates them

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
