//! Posting rules: which transactions may move balances, and by how much.

use std::collections::BTreeMap;

use qayd_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryLine, TransactionStatus};

/// Net change to one account's current balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    /// The account to update.
    pub account_id: AccountId,
    /// Signed amount to add to `current_balance`.
    pub delta: Decimal,
}

/// Checks that a transaction in `status` may be posted.
///
/// # Errors
///
/// Returns [`LedgerError::AlreadyPosted`] or [`LedgerError::TransactionCancelled`].
pub const fn ensure_postable(status: TransactionStatus) -> Result<(), LedgerError> {
    match status {
        TransactionStatus::Pending => Ok(()),
        TransactionStatus::Posted => Err(LedgerError::AlreadyPosted),
        TransactionStatus::Cancelled => Err(LedgerError::TransactionCancelled),
    }
}

/// Checks that a transaction in `status` may be deleted.
///
/// # Errors
///
/// Returns [`LedgerError::CannotDeletePosted`] for posted transactions.
pub const fn ensure_deletable(status: TransactionStatus) -> Result<(), LedgerError> {
    match status {
        TransactionStatus::Posted => Err(LedgerError::CannotDeletePosted),
        TransactionStatus::Pending | TransactionStatus::Cancelled => Ok(()),
    }
}

/// Aggregates the lines into one delta per account.
///
/// Debits add to the balance, credits subtract. Accounts whose movements
/// cancel out are omitted. The result is ordered by account id so concurrent
/// posts lock rows in the same order.
///
/// # Errors
///
/// Returns [`LedgerError::AmountOverflow`] if an account's net movement does
/// not fit a `Decimal`.
pub fn balance_deltas(lines: &[EntryLine]) -> Result<Vec<BalanceDelta>, LedgerError> {
    let mut per_account: BTreeMap<AccountId, Decimal> = BTreeMap::new();
    for line in lines {
        let net = per_account.entry(line.side.account_id()).or_default();
        *net = net
            .checked_add(line.balance_effect())
            .ok_or(LedgerError::AmountOverflow)?;
    }

    Ok(per_account
        .into_iter()
        .filter(|(_, delta)| !delta.is_zero())
        .map(|(account_id, delta)| BalanceDelta { account_id, delta })
        .collect())
}
