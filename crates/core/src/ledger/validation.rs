//! Business rule validation for journal entry lines.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryLine, EntryLineInput, EntrySide, EntryTotals};

/// Largest accepted gap between total debits and total credits (0.01).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount a money column holds (`numeric(16, 4)`): 999999999999.9999.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x6FC0_FFFF, 0x0023_86F2, 0, false, 4);

/// Converts one wire line into a validated [`EntryLine`].
///
/// `line` is the 1-based position used in error messages.
///
/// # Errors
///
/// Returns an error unless exactly one account is set and the amount is
/// positive and no larger than [`MAX_AMOUNT`].
pub fn classify_line(line: usize, input: &EntryLineInput) -> Result<EntryLine, LedgerError> {
    let side = match (input.debit_account_id, input.credit_account_id) {
        (Some(_), Some(_)) => return Err(LedgerError::AmbiguousLine { line }),
        (None, None) => return Err(LedgerError::MissingAccount { line }),
        (Some(id), None) => EntrySide::Debit(id),
        (None, Some(id)) => EntrySide::Credit(id),
    };

    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount { line });
    }
    if input.amount > MAX_AMOUNT {
        return Err(LedgerError::AmountOutOfRange { line });
    }

    Ok(EntryLine {
        side,
        amount: input.amount,
        description: input.description.clone(),
    })
}

/// Classifies every wire line, stopping at the first invalid one.
///
/// # Errors
///
/// Returns [`LedgerError::NoEntries`] for an empty list, otherwise the first
/// error reported by [`classify_line`].
pub fn classify_lines(inputs: &[EntryLineInput]) -> Result<Vec<EntryLine>, LedgerError> {
    if inputs.is_empty() {
        return Err(LedgerError::NoEntries);
    }

    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| classify_line(index + 1, input))
        .collect()
}

/// Checks that debits equal credits within [`BALANCE_TOLERANCE`].
///
/// # Errors
///
/// Returns [`LedgerError::UnbalancedEntries`] with both totals, or
/// [`LedgerError::AmountOverflow`] if the sums do not fit.
pub fn validate_balance(lines: &[EntryLine]) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoEntries);
    }

    let totals = EntryTotals::from_lines(lines)?;
    if totals.difference()?.abs() > BALANCE_TOLERANCE {
        return Err(LedgerError::UnbalancedEntries {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}
