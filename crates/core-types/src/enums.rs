use serde::{Deserialize, Serialize};

/// The metric a product leaderboard is sorted by.
///
/// Sorting is always descending on the chosen metric, with ties broken by
/// product name ascending so output order is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RankKey {
    /// Total gross profit for the product. The default leaderboard order.
    #[default]
    GrossProfit,
    /// Total sales for the product.
    Revenue,
    /// Total units sold.
    Units,
    /// Aggregated gross margin (profit over sales). Products with an
    /// undefined margin sort below every defined one.
    Margin,
    /// Aggregated profit per unit. Undefined values sort last.
    ProfitPerUnit,
}
