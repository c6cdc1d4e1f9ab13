//! Ledger service for transaction validation.
//!
//! This module provides the business logic that runs before a journal
//! transaction is persisted. Lookups are injected as closures so the service
//! stays free of database dependencies.

use qayd_shared::types::{AccountId, FiscalYearId};

use super::error::LedgerError;
use super::posting;
use super::types::{EntryLine, EntryLineInput, EntryTotals, TransactionStatus};
use super::validation::{classify_lines, validate_balance};
use crate::chart::ensure_postable_account;

/// Information about an account needed for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// The fiscal year the account belongs to.
    pub fiscal_year_id: FiscalYearId,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the account groups child accounts.
    pub is_parent: bool,
}

/// The fiscal year a new transaction is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalYearInfo {
    /// The fiscal year ID.
    pub id: FiscalYearId,
    /// Closed years accept no new transactions.
    pub is_closed: bool,
}

/// Entry lines that passed every creation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntries {
    /// Lines in request order.
    pub lines: Vec<EntryLine>,
    /// Debit and credit sums.
    pub totals: EntryTotals,
}

impl ValidatedEntries {
    /// The transaction's recorded total (the debit side).
    #[must_use]
    pub const fn total_amount(&self) -> rust_decimal::Decimal {
        self.totals.debit
    }
}

/// Ledger service for transaction validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates the entry lines of a new transaction.
    ///
    /// This function performs all validation steps:
    /// 1. Rejects closed fiscal years
    /// 2. Requires exactly one account and a positive amount per line
    /// 3. Requires debits to equal credits within the tolerance
    /// 4. Requires every account to exist, be active, be a leaf and belong
    ///    to the transaction's fiscal year
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_entries<A>(
        fiscal_year: FiscalYearInfo,
        entries: &[EntryLineInput],
        account_lookup: A,
    ) -> Result<ValidatedEntries, LedgerError>
    where
        A: Fn(AccountId) -> Option<AccountInfo>,
    {
        if fiscal_year.is_closed {
            return Err(LedgerError::FiscalYearClosed(fiscal_year.id));
        }

        let lines = classify_lines(entries)?;
        let totals = validate_balance(&lines)?;

        for line in &lines {
            let account_id = line.side.account_id();
            let account =
                account_lookup(account_id).ok_or(LedgerError::AccountNotFound(account_id))?;
            ensure_postable_account(&account, fiscal_year.id)?;
        }

        Ok(ValidatedEntries { lines, totals })
    }

    /// Validate that a transaction can be posted.
    ///
    /// # Errors
    ///
    /// Returns error if the transaction is posted or cancelled.
    pub fn validate_can_post(status: TransactionStatus) -> Result<(), LedgerError> {
        posting::ensure_postable(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct Fixture {
        fiscal_year: FiscalYearInfo,
        cash: AccountId,
        revenue: AccountId,
        accounts: HashMap<AccountId, AccountInfo>,
    }

    fn fixture() -> Fixture {
        let fiscal_year = FiscalYearInfo {
            id: FiscalYearId::new(),
            is_closed: false,
        };
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let accounts = [cash, revenue]
            .into_iter()
            .map(|id| {
                (
                    id,
                    AccountInfo {
                        id,
                        fiscal_year_id: fiscal_year.id,
                        is_active: true,
                        is_parent: false,
                    },
                )
            })
            .collect();
        Fixture {
            fiscal_year,
            cash,
            revenue,
            accounts,
        }
    }

    #[test]
    fn test_validate_balanced_transaction() {
        let f = fixture();
        let entries = vec![
            EntryLineInput::debit(f.cash, dec!(100)),
            EntryLineInput::credit(f.revenue, dec!(100)),
        ];

        let validated =
            LedgerService::validate_entries(f.fiscal_year, &entries, |id| f.accounts.get(&id).copied())
                .unwrap();

        assert_eq!(validated.lines.len(), 2);
        assert_eq!(validated.total_amount(), dec!(100));
    }

    #[test]
    fn test_validate_unbalanced_transaction() {
        let f = fixture();
        let entries = vec![
            EntryLineInput::debit(f.cash, dec!(100)),
            EntryLineInput::credit(f.revenue, dec!(50)),
        ];

        let result =
            LedgerService::validate_entries(f.fiscal_year, &entries, |id| f.accounts.get(&id).copied());

        assert!(matches!(result, Err(LedgerError::UnbalancedEntries { .. })));
    }

    #[test]
    fn test_validate_unknown_account() {
        let f = fixture();
        let stranger = AccountId::new();
        let entries = vec![
            EntryLineInput::debit(f.cash, dec!(100)),
            EntryLineInput::credit(stranger, dec!(100)),
        ];

        let result =
            LedgerService::validate_entries(f.fiscal_year, &entries, |id| f.accounts.get(&id).copied());

        assert_eq!(result, Err(LedgerError::AccountNotFound(stranger)));
    }

    #[test]
    fn test_validate_inactive_account() {
        let mut f = fixture();
        if let Some(info) = f.accounts.get_mut(&f.cash) {
            info.is_active = false;
        }
        let entries = vec![
            EntryLineInput::debit(f.cash, dec!(100)),
            EntryLineInput::credit(f.revenue, dec!(100)),
        ];

        let result =
            LedgerService::validate_entries(f.fiscal_year, &entries, |id| f.accounts.get(&id).copied());

        assert_eq!(result, Err(LedgerError::AccountInactive(f.cash)));
    }

    #[test]
    fn test_validate_parent_account() {
        let mut f = fixture();
        if let Some(info) = f.accounts.get_mut(&f.revenue) {
            info.is_parent = true;
        }
        let entries = vec![
            EntryLineInput::debit(f.cash, dec!(100)),
            EntryLineInput::credit(f.revenue, dec!(100)),
        ];

        let result =
            LedgerService::validate_entries(f.fiscal_year, &entries, |id| f.accounts.get(&id).copied());

        assert_eq!(result, Err(LedgerError::ParentAccount(f.revenue)));
    }

    #[test]
    fn test_validate_closed_fiscal_year() {
        let mut f = fixture();
        f.fiscal_year.is_closed = true;
        let entries = vec![
            EntryLineInput::debit(f.cash, dec!(100)),
            EntryLineInput::credit(f.revenue, dec!(100)),
        ];

        let result =
            LedgerService::validate_entries(f.fiscal_year, &entries, |id| f.accounts.get(&id).copied());

        assert_eq!(result, Err(LedgerError::FiscalYearClosed(f.fiscal_year.id)));
    }

    #[test]
    fn test_status_checks() {
        assert!(LedgerService::validate_can_post(TransactionStatus::Pending).is_ok());
        assert!(LedgerService::validate_can_post(TransactionStatus::Posted).is_err());
        assert!(LedgerService::validate_can_post(TransactionStatus::Cancelled).is_err());
    }
}
