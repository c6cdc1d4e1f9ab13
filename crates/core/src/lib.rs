//! Core business logic for Qayd.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal validation, numbering and posting
//! - `chart` - Chart of accounts hierarchy rules
//! - `guards` - Dependency checks that block deletion
//! - `parties` - Customer and supplier classification and balances
//! - `inventory` - Stock level calculations
//! - `auth` - Password hashing and user roles

pub mod auth;
pub mod chart;
pub mod guards;
pub mod inventory;
pub mod ledger;
pub mod parties;
