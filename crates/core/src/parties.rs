//! Customer and supplier classification and balances.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Customer classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    /// A private person.
    #[default]
    Individual,
    /// A legal entity.
    Company,
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => f.write_str("INDIVIDUAL"),
            Self::Company => f.write_str("COMPANY"),
        }
    }
}

/// Supplier classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierType {
    /// Domestic supplier.
    #[default]
    Local,
    /// Supplier abroad.
    Foreign,
}

impl fmt::Display for SupplierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("LOCAL"),
            Self::Foreign => f.write_str("FOREIGN"),
        }
    }
}

/// Outstanding balance of a customer or supplier.
///
/// `invoiced` is the sum of invoice totals; `settled` is the sum of receipts
/// (customers) or payments (suppliers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartyBalance {
    /// Sum of invoice totals.
    pub invoiced: Decimal,
    /// Sum of receipts or payments.
    pub settled: Decimal,
}

impl PartyBalance {
    /// Creates a balance from invoice and settlement sums.
    #[must_use]
    pub const fn new(invoiced: Decimal, settled: Decimal) -> Self {
        Self { invoiced, settled }
    }

    /// Amount still owed.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.invoiced - self.settled
    }

    /// Returns true when `outstanding` exceeds a non-zero `credit_limit`.
    ///
    /// A zero credit limit means no limit is configured.
    #[must_use]
    pub fn exceeds(&self, credit_limit: Decimal) -> bool {
        !credit_limit.is_zero() && self.outstanding() > credit_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outstanding_balance() {
        let balance = PartyBalance::new(dec!(5000), dec!(1200.50));
        assert_eq!(balance.outstanding(), dec!(3799.50));
        assert_eq!(PartyBalance::default().outstanding(), Decimal::ZERO);
    }

    #[test]
    fn test_credit_limit() {
        let balance = PartyBalance::new(dec!(60000), dec!(5000));
        assert!(balance.exceeds(dec!(50000)));
        assert!(!balance.exceeds(dec!(55000)));
        assert!(!balance.exceeds(Decimal::ZERO));
    }

    #[test]
    fn test_party_types_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&CustomerType::Company).unwrap(),
            "\"COMPANY\""
        );
        assert_eq!(
            serde_json::from_str::<SupplierType>("\"FOREIGN\"").unwrap(),
            SupplierType::Foreign
        );
        assert_eq!(CustomerType::default(), CustomerType::Individual);
        assert_eq!(SupplierType::Local.to_string(), "LOCAL");
    }
}
