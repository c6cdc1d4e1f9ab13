//! Stock level calculations.

use rust_decimal::Decimal;

/// Quantity of one stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRecord {
    /// Quantity on hand.
    pub quantity: Decimal,
    /// Quantity promised to open orders.
    pub reserved: Decimal,
}

/// Stock of a product summed across warehouses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevel {
    /// Quantity on hand.
    pub total: Decimal,
    /// Quantity reserved.
    pub reserved: Decimal,
}

impl StockLevel {
    /// Sums the given stock records.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StockRecord>,
    {
        records.into_iter().fold(Self::default(), |acc, record| Self {
            total: acc.total + record.quantity,
            reserved: acc.reserved + record.reserved,
        })
    }

    /// Quantity free to sell.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.total - self.reserved
    }

    /// Returns true when the available quantity is at or below `min_stock`.
    #[must_use]
    pub fn is_low_stock(&self, min_stock: Decimal) -> bool {
        self.available() <= min_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sums_across_warehouses() {
        let level = StockLevel::from_records([
            StockRecord {
                quantity: dec!(10),
                reserved: dec!(2),
            },
            StockRecord {
                quantity: dec!(5),
                reserved: dec!(0),
            },
        ]);
        assert_eq!(level.total, dec!(15));
        assert_eq!(level.reserved, dec!(2));
        assert_eq!(level.available(), dec!(13));
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let level = StockLevel {
            total: dec!(7),
            reserved: dec!(2),
        };
        assert!(level.is_low_stock(dec!(5)));
        assert!(!level.is_low_stock(dec!(4)));
    }

    #[test]
    fn test_no_records_is_empty_stock() {
        let level = StockLevel::from_records(Vec::new());
        assert_eq!(level.available(), Decimal::ZERO);
        assert!(level.is_low_stock(Decimal::ZERO));
    }
}
