//! Shared types, errors, and configuration for Qayd.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - Well-known identifiers of the seeded default records

pub mod config;
pub mod defaults;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
