//! Cost-vs-margin diagnostics: the row-level series behind the "expensive
//! but thin" scatter view.

use crate::report::MarginPoint;
use core_types::Transaction;

/// Maps every filtered row with a defined margin to a `(cost, margin)` point,
/// ordered by cost descending (ties by product name ascending) so the most
/// expensive lines lead. Rows with zero sales have no margin and are skipped.
pub fn margin_scatter(rows: &[&Transaction]) -> Vec<MarginPoint> {
    let mut points: Vec<MarginPoint> = rows
        .iter()
        .filter_map(|row| {
            row.gross_margin().map(|margin| MarginPoint {
                product: row.product.clone(),
                cost: row.cost,
                gross_margin_pct: margin,
            })
        })
        .collect();

    points.sort_by(|a, b| b.cost.cmp(&a.cost).then_with(|| a.product.cmp(&b.product)));
    points
}
