//! Product ranking with a selectable sort key.

use crate::report::ProductSummary;
use core_types::RankKey;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// The value a product is ranked by under the given key. `None` (undefined
/// margin or profit-per-unit) sorts below every defined value.
fn metric(product: &ProductSummary, key: RankKey) -> Option<Decimal> {
    match key {
        RankKey::GrossProfit => Some(product.total_profit),
        RankKey::Revenue => Some(product.total_sales),
        RankKey::Units => Some(Decimal::from(product.total_units)),
        RankKey::Margin => product.gross_margin_pct,
        RankKey::ProfitPerUnit => product.profit_per_unit,
    }
}

/// Descending by metric, undefined last, ties by product name ascending.
fn compare(a: &ProductSummary, b: &ProductSummary, key: RankKey) -> Ordering {
    let ordering = match (metric(a, key), metric(b, key)) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    ordering.then_with(|| a.product.cmp(&b.product))
}

/// Sorts the leaderboard in place by the given key.
pub fn sort_products(products: &mut [ProductSummary], key: RankKey) {
    products.sort_by(|a, b| compare(a, b, key));
}

/// Returns the top `limit` products under the given key, leaving the full
/// aggregate untouched. Contribution shares in the result still refer to the
/// full filtered set, not the truncation.
pub fn top(products: &[ProductSummary], key: RankKey, limit: Option<usize>) -> Vec<ProductSummary> {
    let mut ranked: Vec<ProductSummary> = products.to_vec();
    sort_products(&mut ranked, key);
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(name: &str, sales: Decimal, profit: Decimal, units: i64) -> ProductSummary {
        ProductSummary {
            product: name.to_string(),
            division: "Candy".to_string(),
            total_sales: sales,
            total_profit: profit,
            total_units: units,
            gross_margin_pct: if sales == Decimal::ZERO {
                None
            } else {
                Some(profit / sales)
            },
            profit_per_unit: if units == 0 {
                None
            } else {
                Some(profit / Decimal::from(units))
            },
            revenue_contribution_pct: Some(dec!(0.5)),
            profit_contribution_pct: Some(dec!(0.5)),
        }
    }

    #[test]
    fn default_order_is_profit_descending_with_name_tiebreak() {
        let products = vec![
            product("Sour Worms", dec!(100), dec!(40), 10),
            product("Caramel Chews", dec!(100), dec!(40), 10),
            product("Dark Truffles", dec!(300), dec!(90), 10),
        ];
        let ranked = top(&products, RankKey::GrossProfit, None);
        let names: Vec<&str> = ranked.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, ["Dark Truffles", "Caramel Chews", "Sour Worms"]);
    }

    #[test]
    fn undefined_margin_sorts_last() {
        let products = vec![
            product("Zero Sales", dec!(0), dec!(0), 10),
            product("Thin Margin", dec!(100), dec!(1), 10),
        ];
        let ranked = top(&products, RankKey::Margin, None);
        assert_eq!(ranked[0].product, "Thin Margin");
        assert_eq!(ranked[1].product, "Zero Sales");
    }

    #[test]
    fn truncation_does_not_touch_contributions() {
        let products = vec![
            product("Caramel Chews", dec!(100), dec!(40), 10),
            product("Sour Worms", dec!(50), dec!(10), 5),
        ];
        let ranked = top(&products, RankKey::GrossProfit, Some(1));
        assert_eq!(ranked.len(), 1);
        // The share still refers to the full filtered set.
        assert_eq!(ranked[0].revenue_contribution_pct, Some(dec!(0.5)));
    }
}
