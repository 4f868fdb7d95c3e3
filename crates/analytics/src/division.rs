//! Division-level comparison: totals, margin, and the revenue/profit rank
//! divergence signal.

use crate::aggregate::guarded_ratio;
use crate::report::DivisionSummary;
use core_types::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

struct DivisionAccumulator {
    revenue: Decimal,
    profit: Decimal,
}

/// Groups the filtered set by division and assigns rank positions.
///
/// Ranks are 1-based over the divisions present in the filtered set, sorted
/// descending with ties broken by division name ascending. The divergence
/// `revenue_rank - profit_rank` is the imbalance signal: a negative value
/// marks a division that ranks higher by revenue than by profit.
/// Output is in division-name order.
pub fn compare_divisions(rows: &[&Transaction]) -> Vec<DivisionSummary> {
    let mut groups: BTreeMap<String, DivisionAccumulator> = BTreeMap::new();
    for row in rows {
        let acc = groups
            .entry(row.division.clone())
            .or_insert_with(|| DivisionAccumulator {
                revenue: Decimal::ZERO,
                profit: Decimal::ZERO,
            });
        acc.revenue += row.sales;
        acc.profit += row.gross_profit;
    }

    let mut divisions: Vec<DivisionSummary> = groups
        .into_iter()
        .map(|(division, acc)| DivisionSummary {
            division,
            revenue: acc.revenue,
            profit: acc.profit,
            gross_margin_pct: guarded_ratio(acc.profit, acc.revenue),
            revenue_rank: 0,
            profit_rank: 0,
            rank_divergence: 0,
        })
        .collect();

    assign_ranks(&mut divisions, |d| d.revenue, |d, rank| d.revenue_rank = rank);
    assign_ranks(&mut divisions, |d| d.profit, |d, rank| d.profit_rank = rank);
    for division in &mut divisions {
        division.rank_divergence = division.revenue_rank as i64 - division.profit_rank as i64;
    }

    divisions
}

/// Assigns 1-based descending ranks by the given metric. `divisions` is
/// already in name order, so a stable sort gives the name-ascending
/// tie-break for free.
fn assign_ranks<M, S>(divisions: &mut [DivisionSummary], metric: M, set_rank: S)
where
    M: Fn(&DivisionSummary) -> Decimal,
    S: Fn(&mut DivisionSummary, usize),
{
    let mut order: Vec<usize> = (0..divisions.len()).collect();
    order.sort_by(|&a, &b| metric(&divisions[b]).cmp(&metric(&divisions[a])));
    for (position, index) in order.into_iter().enumerate() {
        set_rank(&mut divisions[index], position + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(division: &str, sales: Decimal, cost: Decimal) -> Transaction {
        Transaction {
            product: "Assorted".to_string(),
            division: division.to_string(),
            region: "East".to_string(),
            state: "NY".to_string(),
            city: "Albany".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ship_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            sales,
            cost,
            gross_profit: sales - cost,
            units: 10,
        }
    }

    #[test]
    fn flags_high_revenue_low_profit_divisions() {
        // Chocolate leads on revenue but trails Gummies on profit.
        let rows = vec![
            row("Chocolate", dec!(1000), dec!(950)),
            row("Gummies", dec!(400), dec!(100)),
            row("Seasonal", dec!(100), dec!(80)),
        ];
        let refs: Vec<&Transaction> = rows.iter().collect();
        let divisions = compare_divisions(&refs);

        // Name order in the output.
        assert_eq!(divisions[0].division, "Chocolate");
        assert_eq!(divisions[0].revenue_rank, 1);
        assert_eq!(divisions[0].profit_rank, 2);
        assert_eq!(divisions[0].rank_divergence, -1);

        assert_eq!(divisions[1].division, "Gummies");
        assert_eq!(divisions[1].revenue_rank, 2);
        assert_eq!(divisions[1].profit_rank, 1);
        assert_eq!(divisions[1].rank_divergence, 1);

        assert_eq!(divisions[2].division, "Seasonal");
        assert_eq!(divisions[2].rank_divergence, 0);
    }

    #[test]
    fn rank_ties_break_by_division_name() {
        let rows = vec![
            row("Gummies", dec!(100), dec!(50)),
            row("Chocolate", dec!(100), dec!(50)),
        ];
        let refs: Vec<&Transaction> = rows.iter().collect();
        let divisions = compare_divisions(&refs);
        assert_eq!(divisions[0].division, "Chocolate");
        assert_eq!(divisions[0].revenue_rank, 1);
        assert_eq!(divisions[1].division, "Gummies");
        assert_eq!(divisions[1].revenue_rank, 2);
    }

    #[test]
    fn empty_set_yields_no_divisions() {
        assert!(compare_divisions(&[]).is_empty());
    }
}
