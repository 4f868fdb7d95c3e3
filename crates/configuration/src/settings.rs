use core_types::RankKey;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub analysis: AnalysisSettings,
}

/// Where the transactions file lives.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    /// Path to the transactions CSV file, relative to the working directory.
    pub path: String,
}

/// Defaults and thresholds for the analytics pipeline. Most of these can be
/// overridden per invocation on the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Cumulative-profit threshold for the concentration count, as a
    /// fraction in (0, 1]. 0.8 asks the classic "how many products make 80%
    /// of the profit" question.
    pub pareto_threshold: Decimal,
    /// Number of rows shown on the product leaderboard when no `--top` is
    /// given.
    pub default_top_n: usize,
    /// Leaderboard sort key used when none is given on the command line.
    pub default_rank_key: RankKey,
    /// Minimum aggregated product margin applied when no `--min-margin` is
    /// given, as a fraction in [0, 1]. Zero filters nothing.
    pub default_min_margin: Decimal,
}
