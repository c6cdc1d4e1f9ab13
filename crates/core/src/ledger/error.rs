//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur while creating, posting or
//! deleting journal transactions.

use qayd_shared::types::{AccountId, FiscalYearId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction has no entry lines.
    #[error("Transaction must have at least one entry")]
    NoEntries,

    /// Debits and credits differ by more than the tolerance.
    #[error("Unbalanced entries: total debit ({debit}) must equal total credit ({credit})")]
    UnbalancedEntries {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry amount is zero or negative.
    #[error("Entry {line}: amount must be positive")]
    NonPositiveAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Entry amount does not fit the stored money column.
    #[error("Entry {line}: amount exceeds the maximum of 999999999999.9999")]
    AmountOutOfRange {
        /// 1-based line number.
        line: usize,
    },

    /// Summing the entry amounts overflowed.
    #[error("Entry amounts exceed the supported range")]
    AmountOverflow,

    /// Entry names both a debit and a credit account.
    #[error("Entry {line}: specify either a debit account or a credit account, not both")]
    AmbiguousLine {
        /// 1-based line number.
        line: usize,
    },

    /// Entry names neither a debit nor a credit account.
    #[error("Entry {line}: a debit account or a credit account is required")]
    MissingAccount {
        /// 1-based line number.
        line: usize,
    },

    /// Stored transaction number is not a decimal integer.
    #[error("Invalid transaction number: {0}")]
    InvalidNumber(String),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Parent accounts group other accounts and take no entries.
    #[error("Account {0} is a parent account and cannot receive entries")]
    ParentAccount(AccountId),

    /// Account belongs to another fiscal year.
    #[error("Account {account_id} does not belong to fiscal year {fiscal_year_id}")]
    AccountFiscalYearMismatch {
        /// The account.
        account_id: AccountId,
        /// The transaction's fiscal year.
        fiscal_year_id: FiscalYearId,
    },

    // ========== Fiscal Year Errors ==========
    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(FiscalYearId),

    /// Fiscal year is closed, no new transactions allowed.
    #[error("Fiscal year {0} is closed")]
    FiscalYearClosed(FiscalYearId),

    // ========== Transaction State Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Transaction was already posted.
    #[error("Transaction is already posted")]
    AlreadyPosted,

    /// Cancelled transactions cannot be posted.
    #[error("Cannot post a cancelled transaction")]
    TransactionCancelled,

    /// Posted transactions cannot be deleted.
    #[error("Cannot delete a posted transaction")]
    CannotDeletePosted,
}
