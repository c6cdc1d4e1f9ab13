//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Domain types for journal transactions and entry lines
//! - Entry line classification and balance validation
//! - Sequential transaction numbering per fiscal year
//! - Posting rules and per-account balance deltas
//! - Error types for ledger operations
//! - Ledger service for transaction validation

pub mod error;
pub mod numbering;
pub mod posting;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use numbering::{format_number, next_sequence, parse_number};
pub use posting::{BalanceDelta, balance_deltas, ensure_deletable, ensure_postable};
pub use service::{AccountInfo, FiscalYearInfo, LedgerService, ValidatedEntries};
pub use types::{
    AccountType, EntryLine, EntryLineInput, EntrySide, EntryTotals, TransactionStatus,
    TransactionType,
};
pub use validation::{
    BALANCE_TOLERANCE, MAX_AMOUNT, classify_line, classify_lines, validate_balance,
};
