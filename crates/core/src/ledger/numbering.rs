//! Sequential transaction numbering within a fiscal year.
//!
//! Numbers are decimal strings backed by an integer sequence. The next number
//! is always the highest issued sequence plus one, so numbers freed by a
//! deleted transaction are only reissued when nothing higher exists.

use super::error::LedgerError;

/// Sequence of the first transaction in a fiscal year.
pub const FIRST_SEQUENCE: i64 = 1;

/// Returns the sequence following `current_max`, or [`FIRST_SEQUENCE`] when
/// the fiscal year has no transactions yet.
#[must_use]
pub fn next_sequence(current_max: Option<i64>) -> i64 {
    current_max.map_or(FIRST_SEQUENCE, |max| max.max(0).saturating_add(1))
}

/// Formats a sequence as the transaction's display number.
#[must_use]
pub fn format_number(sequence: i64) -> String {
    sequence.to_string()
}

/// Parses a display number back into its sequence.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidNumber`] when `number` is not a positive
/// decimal integer.
pub fn parse_number(number: &str) -> Result<i64, LedgerError> {
    match number.trim().parse::<i64>() {
        Ok(sequence) if sequence >= FIRST_SEQUENCE => Ok(sequence),
        _ => Err(LedgerError::InvalidNumber(number.to_string())),
    }
}
