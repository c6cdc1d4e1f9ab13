//! Users and password hashing.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Role of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full access.
    Admin,
    /// Branch management.
    Manager,
    /// Books transactions and maintains the chart of accounts.
    Accountant,
    /// Day-to-day data entry.
    #[default]
    User,
}

impl UserRole {
    /// Returns true if this role may post journal transactions.
    #[must_use]
    pub const fn can_post_transactions(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Accountant)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Accountant => "ACCOUNTANT",
            Self::User => "USER",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_roles() {
        assert!(UserRole::Admin.can_post_transactions());
        assert!(UserRole::Accountant.can_post_transactions());
        assert!(!UserRole::User.can_post_transactions());
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserRole::Manager.to_string(), "MANAGER");
    }
}
