use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single product-level order line from the sales dataset.
///
/// This is the only entity in the system. The dataset is loaded once at
/// startup and is immutable for the session; every aggregate the engine
/// produces is derived fresh from a slice of these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub product: String,
    pub division: String,
    pub region: String,
    pub state: String,
    pub city: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    /// Revenue for the line, in currency units.
    pub sales: Decimal,
    pub cost: Decimal,
    /// Expected to equal `sales - cost`. Taken from the source file when the
    /// column is present, derived otherwise; never recomputed after load.
    pub gross_profit: Decimal,
    pub units: i64,
}

impl Transaction {
    /// Gross margin for this line, as a fraction of sales.
    ///
    /// Returns `None` when `sales` is zero: an undefined margin is distinct
    /// from a 0% margin and must never be reported as one.
    pub fn gross_margin(&self) -> Option<Decimal> {
        if self.sales == Decimal::ZERO {
            None
        } else {
            Some(self.gross_profit / self.sales)
        }
    }

    /// Profit earned per unit sold. Returns `None` when `units` is zero.
    pub fn profit_per_unit(&self) -> Option<Decimal> {
        if self.units == 0 {
            None
        } else {
            Some(self.gross_profit / Decimal::from(self.units))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(sales: Decimal, cost: Decimal, units: i64) -> Transaction {
        Transaction {
            product: "Sour Worms".to_string(),
            division: "Candy".to_string(),
            region: "East".to_string(),
            state: "NY".to_string(),
            city: "Brooklyn".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ship_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            sales,
            cost,
            gross_profit: sales - cost,
            units,
        }
    }

    #[test]
    fn margin_is_fraction_of_sales() {
        let t = row(dec!(100), dec!(60), 10);
        assert_eq!(t.gross_margin(), Some(dec!(0.4)));
        assert_eq!(t.profit_per_unit(), Some(dec!(4)));
    }

    #[test]
    fn zero_denominators_are_undefined_not_zero() {
        let t = row(dec!(0), dec!(5), 0);
        assert_eq!(t.gross_margin(), None);
        assert_eq!(t.profit_per_unit(), None);
    }
}
