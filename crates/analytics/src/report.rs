use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The complete output of one pipeline run: everything the presentation layer
/// needs to draw the dashboard for a given filter state.
///
/// All ratio fields are fractions in [0, 1]; scaling to percent is a display
/// concern. A ratio whose denominator was zero is `None` ("n/a"), which is
/// deliberately distinct from a true zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityReport {
    pub summary: SummaryMetrics,
    /// Per-product aggregates, pre-sorted by the default rank key
    /// (gross profit descending, ties by product name ascending).
    pub products: Vec<ProductSummary>,
    /// Per-division aggregates in division-name order.
    pub divisions: Vec<DivisionSummary>,
    pub pareto: ParetoAnalysis,
}

/// Dataset-level KPIs for the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub row_count: usize,
    pub product_count: usize,
    pub total_sales: Decimal,
    pub total_profit: Decimal,
    pub total_units: i64,
    /// Total profit over total sales. `None` when total sales is zero.
    pub gross_margin_pct: Option<Decimal>,
    /// Mean of the per-row margins that are defined. `None` when no filtered
    /// row has one. This is the headline "Avg Gross Margin" figure and is a
    /// different statistic from `gross_margin_pct`.
    pub mean_row_margin: Option<Decimal>,
}

impl SummaryMetrics {
    /// Creates a zeroed-out summary, the defined empty state for a filter
    /// that matches nothing.
    pub fn new() -> Self {
        Self {
            row_count: 0,
            product_count: 0,
            total_sales: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            total_units: 0,
            gross_margin_pct: None,
            mean_row_margin: None,
        }
    }
}

impl Default for SummaryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates for one product over the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product: String,
    /// Division of the product's first row in the filtered set. Products are
    /// not expected to span divisions; if one does, the label is still
    /// deterministic for a given dataset.
    pub division: String,
    pub total_sales: Decimal,
    pub total_profit: Decimal,
    pub total_units: i64,
    /// Total profit over total sales for this product. `None` when the
    /// product's sales sum to zero.
    pub gross_margin_pct: Option<Decimal>,
    /// Total profit over total units. `None` when units sum to zero.
    pub profit_per_unit: Option<Decimal>,
    /// Share of the full filtered set's sales. Always relative to the full
    /// set, never to a top-N truncation. `None` when total sales is zero.
    pub revenue_contribution_pct: Option<Decimal>,
    /// Share of the full filtered set's profit. `None` when total profit is
    /// zero or negative (the undefined case).
    pub profit_contribution_pct: Option<Decimal>,
}

/// Aggregates and rank positions for one division over the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionSummary {
    pub division: String,
    pub revenue: Decimal,
    pub profit: Decimal,
    /// Profit over revenue. `None` when revenue is zero.
    pub gross_margin_pct: Option<Decimal>,
    /// 1-based position when divisions are sorted by revenue descending.
    pub revenue_rank: usize,
    /// 1-based position when divisions are sorted by profit descending.
    pub profit_rank: usize,
    /// `revenue_rank - profit_rank`. Negative flags the imbalance of
    /// interest: the division earns a high revenue rank but a lower profit
    /// rank, i.e. revenue without a proportionate profit share.
    pub rank_divergence: i64,
}

/// One step of the cumulative profit-concentration curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoEntry {
    /// 1-based rank by total profit descending.
    pub rank: usize,
    pub product: String,
    pub total_profit: Decimal,
    pub cumulative_profit: Decimal,
    /// Running share of total filtered profit, in [0, 1] once the curve is
    /// complete.
    pub cumulative_pct: Decimal,
}

/// The profit-concentration analysis for the filtered set.
///
/// When total filtered profit is zero or negative the curve is undefined:
/// `entries` is empty and `concentration_count` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoAnalysis {
    /// The cumulative-profit threshold the concentration count refers to.
    pub threshold: Decimal,
    pub entries: Vec<ParetoEntry>,
    /// Size of the minimal product prefix whose cumulative profit share
    /// reaches `threshold`.
    pub concentration_count: Option<usize>,
}

/// One point of the cost-vs-margin diagnostic series: a filtered row with a
/// defined margin, keyed by the cost of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginPoint {
    pub product: String,
    pub cost: Decimal,
    pub gross_margin_pct: Decimal,
}
