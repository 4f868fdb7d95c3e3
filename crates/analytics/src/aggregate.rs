//! Explicit group-by-key aggregation over filtered rows.
//!
//! Grouping uses `BTreeMap` keyed by product (or division) name so iteration
//! order, and therefore every tie-break downstream, is deterministic.

use crate::report::{ProductSummary, SummaryMetrics};
use core_types::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Sums over the whole filtered set: the denominators for every contribution
/// share.
#[derive(Debug, Clone, Copy, Default)]
pub struct Totals {
    pub sales: Decimal,
    pub profit: Decimal,
    pub units: i64,
    pub rows: usize,
}

/// Sums the filtered set.
pub fn totals(rows: &[&Transaction]) -> Totals {
    let mut totals = Totals::default();
    for row in rows {
        totals.sales += row.sales;
        totals.profit += row.gross_profit;
        totals.units += row.units;
        totals.rows += 1;
    }
    totals
}

/// Divides `numerator / denominator`, returning `None` for a zero
/// denominator. Every ratio in this crate goes through here.
pub fn guarded_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator == Decimal::ZERO {
        None
    } else {
        Some(numerator / denominator)
    }
}

struct ProductAccumulator {
    division: String,
    sales: Decimal,
    profit: Decimal,
    units: i64,
}

/// Groups the filtered rows by product and computes the per-product metrics.
///
/// Contribution shares are left as `None` here; they are filled in by
/// [`apply_contributions`] once the engine knows the final filtered set
/// (the margin threshold can still remove whole products after this step).
/// Output is in product-name order.
pub fn aggregate_products(rows: &[&Transaction]) -> Vec<ProductSummary> {
    let mut groups: BTreeMap<String, ProductAccumulator> = BTreeMap::new();
    for row in rows {
        let acc = groups
            .entry(row.product.clone())
            .or_insert_with(|| ProductAccumulator {
                division: row.division.clone(),
                sales: Decimal::ZERO,
                profit: Decimal::ZERO,
                units: 0,
            });
        acc.sales += row.sales;
        acc.profit += row.gross_profit;
        acc.units += row.units;
    }

    groups
        .into_iter()
        .map(|(product, acc)| ProductSummary {
            product,
            division: acc.division,
            total_sales: acc.sales,
            total_profit: acc.profit,
            total_units: acc.units,
            gross_margin_pct: guarded_ratio(acc.profit, acc.sales),
            profit_per_unit: guarded_ratio(acc.profit, Decimal::from(acc.units)),
            revenue_contribution_pct: None,
            profit_contribution_pct: None,
        })
        .collect()
}

/// Fills in each product's share of the filtered set's sales and profit.
///
/// Revenue shares are undefined when total sales is zero; profit shares are
/// undefined when total profit is zero or negative (a share of a negative
/// total is meaningless and must not be reported as a percentage).
pub fn apply_contributions(products: &mut [ProductSummary], totals: &Totals) {
    let profit_denominator = if totals.profit > Decimal::ZERO {
        Some(totals.profit)
    } else {
        None
    };

    for product in products {
        product.revenue_contribution_pct = guarded_ratio(product.total_sales, totals.sales);
        product.profit_contribution_pct =
            profit_denominator.map(|total| product.total_profit / total);
    }
}

/// Computes the dataset-level KPIs for the filtered set.
pub fn summarize(rows: &[&Transaction], product_count: usize) -> SummaryMetrics {
    let totals = totals(rows);

    // Mean of the row margins that are defined. With load-time sanitation in
    // place every row has one, but the engine does not rely on that.
    let mut margin_sum = Decimal::ZERO;
    let mut margin_count = 0u32;
    for row in rows {
        if let Some(margin) = row.gross_margin() {
            margin_sum += margin;
            margin_count += 1;
        }
    }

    SummaryMetrics {
        row_count: totals.rows,
        product_count,
        total_sales: totals.sales,
        total_profit: totals.profit,
        total_units: totals.units,
        gross_margin_pct: guarded_ratio(totals.profit, totals.sales),
        mean_row_margin: guarded_ratio(margin_sum, Decimal::from(margin_count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(product: &str, division: &str, sales: Decimal, cost: Decimal, units: i64) -> Transaction {
        Transaction {
            product: product.to_string(),
            division: division.to_string(),
            region: "East".to_string(),
            state: "NY".to_string(),
            city: "Albany".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ship_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            sales,
            cost,
            gross_profit: sales - cost,
            units,
        }
    }

    // The worked example: A aggregates to sales=150, profit=45, margin=0.30;
    // B to sales=200, profit=150, margin=0.75.
    fn fixture() -> Vec<Transaction> {
        vec![
            row("Product A", "X", dec!(100), dec!(60), 10),
            row("Product A", "X", dec!(50), dec!(45), 5),
            row("Product B", "Y", dec!(200), dec!(50), 20),
        ]
    }

    #[test]
    fn aggregates_products_across_rows() {
        let rows = fixture();
        let refs: Vec<&Transaction> = rows.iter().collect();
        let products = aggregate_products(&refs);

        assert_eq!(products.len(), 2);
        let a = &products[0];
        assert_eq!(a.product, "Product A");
        assert_eq!(a.total_sales, dec!(150));
        assert_eq!(a.total_profit, dec!(45));
        assert_eq!(a.total_units, 15);
        assert_eq!(a.gross_margin_pct, Some(dec!(0.30)));
        assert_eq!(a.profit_per_unit, Some(dec!(3)));

        let b = &products[1];
        assert_eq!(b.total_sales, dec!(200));
        assert_eq!(b.total_profit, dec!(150));
        assert_eq!(b.gross_margin_pct, Some(dec!(0.75)));
    }

    #[test]
    fn contributions_sum_to_one() {
        let rows = fixture();
        let refs: Vec<&Transaction> = rows.iter().collect();
        let mut products = aggregate_products(&refs);
        let totals = totals(&refs);
        apply_contributions(&mut products, &totals);

        let a = &products[0];
        let b = &products[1];
        // 45 / 195 and 150 / 195.
        assert_eq!(a.profit_contribution_pct, Some(dec!(45) / dec!(195)));
        assert_eq!(b.profit_contribution_pct, Some(dec!(150) / dec!(195)));

        let revenue_sum: Decimal = products
            .iter()
            .filter_map(|p| p.revenue_contribution_pct)
            .sum();
        let profit_sum: Decimal = products
            .iter()
            .filter_map(|p| p.profit_contribution_pct)
            .sum();
        assert!((revenue_sum - Decimal::ONE).abs() < dec!(0.0001));
        assert!((profit_sum - Decimal::ONE).abs() < dec!(0.0001));
    }

    #[test]
    fn profit_contributions_are_undefined_for_non_positive_total() {
        let rows = vec![
            row("Product A", "X", dec!(100), dec!(120), 10),
            row("Product B", "Y", dec!(50), dec!(40), 5),
        ];
        let refs: Vec<&Transaction> = rows.iter().collect();
        let mut products = aggregate_products(&refs);
        let totals = totals(&refs);
        assert_eq!(totals.profit, dec!(-10));

        apply_contributions(&mut products, &totals);
        assert!(products.iter().all(|p| p.profit_contribution_pct.is_none()));
        // Revenue shares stay defined: sales are still positive.
        assert!(products.iter().all(|p| p.revenue_contribution_pct.is_some()));
    }

    #[test]
    fn zero_sales_group_has_undefined_margin() {
        let rows = vec![row("Product A", "X", dec!(0), dec!(0), 4)];
        let refs: Vec<&Transaction> = rows.iter().collect();
        let products = aggregate_products(&refs);
        assert_eq!(products[0].gross_margin_pct, None);
        assert_eq!(products[0].profit_per_unit, Some(dec!(0)));
    }

    #[test]
    fn summary_separates_ratio_of_totals_from_mean_of_rows() {
        let rows = fixture();
        let refs: Vec<&Transaction> = rows.iter().collect();
        let summary = summarize(&refs, 2);

        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.total_sales, dec!(350));
        assert_eq!(summary.total_profit, dec!(195));
        // 195 / 350.
        assert_eq!(summary.gross_margin_pct, Some(dec!(195) / dec!(350)));
        // Mean of 0.4, 0.1, 0.75.
        assert_eq!(summary.mean_row_margin, Some(dec!(1.25) / dec!(3)));
    }

    #[test]
    fn empty_set_summarizes_to_zero_state() {
        let summary = summarize(&[], 0);
        assert_eq!(summary, SummaryMetrics::new());
    }
}
