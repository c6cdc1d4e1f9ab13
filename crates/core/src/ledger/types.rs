//! Ledger domain types for transaction creation and posting.
//!
//! This module defines the core types used for creating, validating and
//! posting journal transactions in the double-entry bookkeeping system.

use std::fmt;

use qayd_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Resources owned by the company.
    Assets,
    /// Obligations owed to others.
    Liabilities,
    /// Owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expenses,
}

impl AccountType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "ASSETS",
            Self::Liabilities => "LIABILITIES",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expenses => "EXPENSES",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// General journal entry.
    Journal,
    /// Cash received.
    Receipt,
    /// Cash paid out.
    Payment,
    /// Opening balances of a fiscal year.
    Opening,
    /// Year-end closing entry.
    Closing,
}

impl TransactionType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Journal => "JOURNAL",
            Self::Receipt => "RECEIPT",
            Self::Payment => "PAYMENT",
            Self::Opening => "OPENING",
            Self::Closing => "CLOSING",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction lifecycle status.
///
/// Transactions start `Pending`. `Posted` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Recorded, balances untouched.
    Pending,
    /// Applied to account balances (immutable).
    Posted,
    /// Abandoned before posting.
    Cancelled,
}

impl TransactionStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Posted => "POSTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if the transaction can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The side of a journal entry line and the account it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySide {
    /// Increases the account's current balance when posted.
    Debit(AccountId),
    /// Decreases the account's current balance when posted.
    Credit(AccountId),
}

impl EntrySide {
    /// The account this line moves.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        match self {
            Self::Debit(id) | Self::Credit(id) => *id,
        }
    }

    /// Returns true for the debit side.
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        matches!(self, Self::Debit(_))
    }

    /// Splits the side back into the nullable `(debit, credit)` pair used for storage.
    #[must_use]
    pub const fn into_columns(self) -> (Option<AccountId>, Option<AccountId>) {
        match self {
            Self::Debit(id) => (Some(id), None),
            Self::Credit(id) => (None, Some(id)),
        }
    }
}

/// A validated journal entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    /// Debit or credit account.
    pub side: EntrySide,
    /// Strictly positive amount.
    pub amount: Decimal,
    /// Optional line memo.
    pub description: Option<String>,
}

impl EntryLine {
    /// Signed effect on the account's current balance.
    #[must_use]
    pub fn balance_effect(&self) -> Decimal {
        match self.side {
            EntrySide::Debit(_) => self.amount,
            EntrySide::Credit(_) => -self.amount,
        }
    }
}

/// Entry line as received over the wire: two nullable account ids.
///
/// Converted into an [`EntryLine`] by [`super::validation::classify_lines`],
/// which requires exactly one id to be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryLineInput {
    /// Account to debit.
    #[serde(default)]
    pub debit_account_id: Option<AccountId>,
    /// Account to credit.
    #[serde(default)]
    pub credit_account_id: Option<AccountId>,
    /// Line amount.
    pub amount: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}

impl EntryLineInput {
    /// Debit line shorthand.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            debit_account_id: Some(account_id),
            credit_account_id: None,
            amount,
            description: None,
        }
    }

    /// Credit line shorthand.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            debit_account_id: None,
            credit_account_id: Some(account_id),
            amount,
            description: None,
        }
    }
}

/// Debit and credit sums of a set of entry lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Sum of debit line amounts.
    pub debit: Decimal,
    /// Sum of credit line amounts.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums the amounts on each side.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if a side does not fit a `Decimal`.
    pub fn from_lines(lines: &[EntryLine]) -> Result<Self, LedgerError> {
        lines.iter().try_fold(
            Self {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
            |mut totals, line| -> Result<Self, LedgerError> {
                let side = match line.side {
                    EntrySide::Debit(_) => &mut totals.debit,
                    EntrySide::Credit(_) => &mut totals.credit,
                };
                *side = side
                    .checked_add(line.amount)
                    .ok_or(LedgerError::AmountOverflow)?;
                Ok(totals)
            },
        )
    }

    /// Returns the difference between debits and credits.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if the difference does not fit.
    pub fn difference(&self) -> Result<Decimal, LedgerError> {
        self.debit
            .checked_sub(self.credit)
            .ok_or(LedgerError::AmountOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Posted.is_terminal());
        assert!(TransactionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_enums_use_screaming_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&AccountType::Liabilities).unwrap(),
            "\"LIABILITIES\""
        );
        assert_eq!(
            serde_json::from_str::<TransactionType>("\"OPENING\"").unwrap(),
            TransactionType::Opening
        );
        assert_eq!(TransactionStatus::Posted.to_string(), "POSTED");
    }

    #[test]
    fn test_entry_side_columns() {
        let id = AccountId::new();
        assert_eq!(EntrySide::Debit(id).into_columns(), (Some(id), None));
        assert_eq!(EntrySide::Credit(id).into_columns(), (None, Some(id)));
        assert_eq!(EntrySide::Credit(id).account_id(), id);
    }

    #[test]
    fn test_balance_effect_sign() {
        let id = AccountId::new();
        let debit = EntryLine {
            side: EntrySide::Debit(id),
            amount: dec!(100),
            description: None,
        };
        let credit = EntryLine {
            side: EntrySide::Credit(id),
            amount: dec!(40),
            description: None,
        };
        assert_eq!(debit.balance_effect(), dec!(100));
        assert_eq!(credit.balance_effect(), dec!(-40));

        let totals = EntryTotals::from_lines(&[debit, credit]).unwrap();
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(40));
        assert_eq!(totals.difference(), Ok(dec!(60)));
    }

    #[test]
    fn test_entry_line_input_accepts_numbers_and_strings() {
        let id = AccountId::new();
        let json = format!(r#"{{"debitAccountId":"{id}","amount":100.5}}"#);
        let input: EntryLineInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input.debit_account_id, Some(id));
        assert_eq!(input.credit_account_id, None);
        assert_eq!(input.amount, dec!(100.5));

        let json = format!(r#"{{"creditAccountId":"{id}","amount":"42.10"}}"#);
        let input: EntryLineInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input.amount, dec!(42.10));
    }
}
