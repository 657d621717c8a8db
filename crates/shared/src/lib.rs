//! Shared types and configuration for Vola.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes supported by the ledger
//! - Pagination types for list endpoints
//! - JWT claims and token validation
//! - Configuration management

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
