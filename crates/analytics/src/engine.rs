use crate::aggregate;
use crate::diagnostics;
use crate::division;
use crate::error::AnalyticsError;
use crate::filter::FilterSpec;
use crate::leaderboard;
use crate::pareto;
use crate::report::{MarginPoint, ProfitabilityReport};
use core_types::{RankKey, Transaction};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

/// A stateless calculator deriving the full profitability picture from the
/// dataset and one filter specification.
///
/// Every control change on the dashboard is a fresh `run`: filter, aggregate,
/// rank, and analyze in sequence, with no caches and no shared state. The
/// dataset slice is never mutated.
#[derive(Debug, Clone)]
pub struct ProfitabilityEngine {
    pareto_threshold: Decimal,
}

impl ProfitabilityEngine {
    /// Creates an engine with the given Pareto concentration threshold
    /// (a fraction in `(0, 1]`, conventionally 0.8).
    pub fn new(pareto_threshold: Decimal) -> Result<Self, AnalyticsError> {
        if pareto_threshold <= Decimal::ZERO || pareto_threshold > Decimal::ONE {
            return Err(AnalyticsError::InvalidThreshold(pareto_threshold));
        }
        Ok(Self { pareto_threshold })
    }

    /// The main entry point: computes the complete report for one filter
    /// state.
    ///
    /// The only error paths are invalid inputs; degenerate data (an empty
    /// filtered set, zero sales, non-positive total profit) produces the
    /// defined empty/`None` states instead.
    pub fn run(
        &self,
        rows: &[Transaction],
        spec: &FilterSpec,
    ) -> Result<ProfitabilityReport, AnalyticsError> {
        // 1. Filter rows, then drop whole products below the margin threshold.
        let filtered = self.filtered_rows(rows, spec)?;

        // 2. Aggregate the surviving set per product.
        let mut products = aggregate::aggregate_products(&filtered);

        // 3. Contributions are shares of the surviving set's totals.
        let totals = aggregate::totals(&filtered);
        aggregate::apply_contributions(&mut products, &totals);

        // 4. Default leaderboard order; callers re-rank with `leaderboard::top`.
        leaderboard::sort_products(&mut products, RankKey::default());

        let summary = aggregate::summarize(&filtered, products.len());
        let divisions = division::compare_divisions(&filtered);
        let pareto = pareto::concentration(&products, self.pareto_threshold);

        debug!(
            rows_in = rows.len(),
            rows_kept = filtered.len(),
            products = products.len(),
            "profitability pipeline complete"
        );

        Ok(ProfitabilityReport {
            summary,
            products,
            divisions,
            pareto,
        })
    }

    /// The filtered table itself: row-level criteria first, then the margin
    /// threshold applied to aggregated per-product margins. Everything the
    /// engine reports is relative to this set.
    pub fn filtered_rows<'a>(
        &self,
        rows: &'a [Transaction],
        spec: &FilterSpec,
    ) -> Result<Vec<&'a Transaction>, AnalyticsError> {
        if spec.min_margin < Decimal::ZERO || spec.min_margin > Decimal::ONE {
            return Err(AnalyticsError::InvalidFilter(format!(
                "margin threshold {} is outside [0, 1]",
                spec.min_margin
            )));
        }

        let mut filtered = spec.filter_rows(rows);

        // A zero threshold keeps everything, including products whose margin
        // is undefined; any positive threshold drops those, since an unknown
        // margin cannot be shown to clear it.
        if spec.min_margin > Decimal::ZERO {
            let aggregates = aggregate::aggregate_products(&filtered);
            let passing: HashSet<&str> = aggregates
                .iter()
                .filter(|p| {
                    p.gross_margin_pct
                        .is_some_and(|margin| margin >= spec.min_margin)
                })
                .map(|p| p.product.as_str())
                .collect();
            filtered.retain(|row| passing.contains(row.product.as_str()));
        }

        Ok(filtered)
    }

    /// The cost-vs-margin diagnostic series for the same filtered set
    /// `run` reports on.
    pub fn diagnostics(
        &self,
        rows: &[Transaction],
        spec: &FilterSpec,
    ) -> Result<Vec<MarginPoint>, AnalyticsError> {
        let filtered = self.filtered_rows(rows, spec)?;
        Ok(diagnostics::margin_scatter(&filtered))
    }
}
