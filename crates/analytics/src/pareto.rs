//! Profit-concentration (Pareto) analysis.

use crate::report::{ParetoAnalysis, ParetoEntry, ProductSummary};
use rust_decimal::Decimal;

/// Builds the cumulative profit curve and the concentration count: the size
/// of the minimal product prefix whose cumulative profit share reaches
/// `threshold`.
///
/// Products are ranked by total profit descending, ties by name ascending.
/// When total profit is zero or negative the curve is undefined and the
/// analysis is empty; the caller renders that as "no concentration", not as
/// an error.
pub fn concentration(products: &[ProductSummary], threshold: Decimal) -> ParetoAnalysis {
    let total_profit: Decimal = products.iter().map(|p| p.total_profit).sum();
    if total_profit <= Decimal::ZERO {
        return ParetoAnalysis {
            threshold,
            entries: Vec::new(),
            concentration_count: None,
        };
    }

    let mut ranked: Vec<&ProductSummary> = products.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_profit
            .cmp(&a.total_profit)
            .then_with(|| a.product.cmp(&b.product))
    });

    let mut entries = Vec::with_capacity(ranked.len());
    let mut cumulative_profit = Decimal::ZERO;
    let mut concentration_count = None;
    for (index, product) in ranked.into_iter().enumerate() {
        cumulative_profit += product.total_profit;
        let cumulative_pct = cumulative_profit / total_profit;
        if concentration_count.is_none() && cumulative_pct >= threshold {
            concentration_count = Some(index + 1);
        }
        entries.push(ParetoEntry {
            rank: index + 1,
            product: product.product.clone(),
            total_profit: product.total_profit,
            cumulative_profit,
            cumulative_pct,
        });
    }

    ParetoAnalysis {
        threshold,
        entries,
        concentration_count,
    }
}
