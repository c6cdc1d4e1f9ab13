//! Chart of accounts hierarchy rules.

use qayd_shared::types::FiscalYearId;
use rust_decimal::Decimal;

use crate::ledger::{AccountInfo, LedgerError};

/// Level of a top-level account.
pub const ROOT_LEVEL: i32 = 1;

/// Level of a new account under `parent_level` (root accounts have no parent).
#[must_use]
pub fn child_level(parent_level: Option<i32>) -> i32 {
    parent_level.map_or(ROOT_LEVEL, |level| level.saturating_add(1))
}

/// Amount to add to the current balance when the opening balance changes
/// from `old_opening` to `new_opening`.
///
/// Movements already posted stay in the balance; only the opening part moves.
///
/// # Errors
///
/// Returns [`LedgerError::AmountOverflow`] if the difference does not fit.
pub fn opening_balance_shift(
    old_opening: Decimal,
    new_opening: Decimal,
) -> Result<Decimal, LedgerError> {
    new_opening
        .checked_sub(old_opening)
        .ok_or(LedgerError::AmountOverflow)
}

/// Checks that `account` can receive journal entries in `fiscal_year_id`.
///
/// # Errors
///
/// Returns an error for inactive accounts, parent accounts and accounts of
/// another fiscal year.
pub fn ensure_postable_account(
    account: &AccountInfo,
    fiscal_year_id: FiscalYearId,
) -> Result<(), LedgerError> {
    if account.fiscal_year_id != fiscal_year_id {
        return Err(LedgerError::AccountFiscalYearMismatch {
            account_id: account.id,
            fiscal_year_id,
        });
    }
    if !account.is_active {
        return Err(LedgerError::AccountInactive(account.id));
    }
    if account.is_parent {
        return Err(LedgerError::ParentAccount(account.id));
    }
    Ok(())
}
