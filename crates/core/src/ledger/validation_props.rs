//! Property-based tests for entry line classification and balance validation.

use proptest::prelude::*;
use qayd_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::posting::balance_deltas;
use super::types::EntryLineInput;
use super::validation::{BALANCE_TOLERANCE, classify_lines, validate_balance};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Generate amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a zero or negative amount.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Strategy for a list of one-sided lines: `true` marks a debit.
fn lines_strategy() -> impl Strategy<Value = Vec<(bool, Decimal)>> {
    prop::collection::vec((any::<bool>(), positive_amount()), 1..12)
}

fn to_inputs(lines: &[(bool, Decimal)]) -> Vec<EntryLineInput> {
    lines
        .iter()
        .map(|&(is_debit, amount)| {
            if is_debit {
                EntryLineInput::debit(AccountId::new(), amount)
            } else {
                EntryLineInput::credit(AccountId::new(), amount)
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Balance acceptance
    // =========================================================================

    /// Validation accepts exactly when |debit - credit| <= 0.01.
    #[test]
    fn prop_accepts_iff_within_tolerance(lines in lines_strategy()) {
        let inputs = to_inputs(&lines);
        let debit: Decimal = lines.iter().filter(|l| l.0).map(|l| l.1).sum();
        let credit: Decimal = lines.iter().filter(|l| !l.0).map(|l| l.1).sum();

        let classified = classify_lines(&inputs).unwrap();
        let result = validate_balance(&classified);

        if (debit - credit).abs() <= BALANCE_TOLERANCE {
            prop_assert!(result.is_ok(), "expected balanced, got {:?}", result);
        } else {
            prop_assert_eq!(
                result,
                Err(LedgerError::UnbalancedEntries { debit, credit })
            );
        }
    }

    /// A debit mirrored by credits splitting the same total always balances.
    #[test]
    fn prop_split_credit_balances(a in positive_amount(), b in positive_amount()) {
        let inputs = vec![
            EntryLineInput::debit(AccountId::new(), a + b),
            EntryLineInput::credit(AccountId::new(), a),
            EntryLineInput::credit(AccountId::new(), b),
        ];

        let classified = classify_lines(&inputs).unwrap();
        let totals = validate_balance(&classified).unwrap();
        prop_assert_eq!(totals.debit, a + b);
        prop_assert_eq!(totals.credit, a + b);
    }

    // =========================================================================
    // Line classification
    // =========================================================================

    /// Zero or negative amounts are rejected wherever they appear.
    #[test]
    fn prop_non_positive_amount_rejected(
        lines in lines_strategy(),
        bad in non_positive_amount(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut inputs = to_inputs(&lines);
        let at = position.index(inputs.len());
        inputs[at].amount = bad;

        prop_assert_eq!(
            classify_lines(&inputs),
            Err(LedgerError::NonPositiveAmount { line: at + 1 })
        );
    }

    /// Lines naming both sides are rejected with their position.
    #[test]
    fn prop_two_sided_line_rejected(
        lines in lines_strategy(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut inputs = to_inputs(&lines);
        let at = position.index(inputs.len());
        inputs[at].debit_account_id = Some(AccountId::new());
        inputs[at].credit_account_id = Some(AccountId::new());

        prop_assert_eq!(
            classify_lines(&inputs),
            Err(LedgerError::AmbiguousLine { line: at + 1 })
        );
    }

    // =========================================================================
    // Posting deltas
    // =========================================================================

    /// Posting a balanced transaction moves balances by a net total of zero.
    #[test]
    fn prop_deltas_net_to_difference(lines in lines_strategy()) {
        let classified = classify_lines(&to_inputs(&lines)).unwrap();
        let net: Decimal = balance_deltas(&classified).unwrap().iter().map(|d| d.delta).sum();
        let debit: Decimal = lines.iter().filter(|l| l.0).map(|l| l.1).sum();
        let credit: Decimal = lines.iter().filter(|l| !l.0).map(|l| l.1).sum();
        prop_assert_eq!(net, debit - credit);
    }
}
