//! Well-known identifiers of the default records created by the seeder.
//!
//! Requests that omit a fiscal year, branch or user fall back to the ids in
//! [`crate::config::DefaultsConfig`], which in turn default to these values.

use uuid::Uuid;

/// The default company.
pub const DEFAULT_COMPANY_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// The main branch of the default company.
pub const DEFAULT_BRANCH_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

/// The current fiscal year of the default company.
pub const DEFAULT_FISCAL_YEAR_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);

/// The seeded administrator.
pub const ADMIN_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0004);

/// The main warehouse of the default branch.
pub const DEFAULT_WAREHOUSE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0005);
