//! # Meridian Analytics Engine
//!
//! This crate derives the complete profitability picture — per-product and
//! per-division aggregates, leaderboards, and the profit-concentration
//! analysis — from the transactions dataset and a filter specification.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   files, terminals, or rendering. It depends only on `core-types`
//!   (Layer 0), and the presentation layer consumes its plain data structs.
//! - **Stateless Recomputation:** `ProfitabilityEngine::run` is a pure
//!   function of the dataset and a `FilterSpec`. Every filter change is a
//!   full, deterministic recomputation; there are no caches and no shared
//!   mutable state.
//! - **Defined degenerate states:** a zero denominator is `None`, an empty
//!   filtered set is an empty report. Arithmetic never faults.
//!
//! ## Public API
//!
//! - `ProfitabilityEngine`: the pipeline (filter → aggregate → rank →
//!   analyze).
//! - `FilterSpec`: one dashboard interaction's complete filter state.
//! - `ProfitabilityReport` and its parts: the standardized output structs.
//! - `AnalyticsError`: the specific error types this crate can return.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod diagnostics;
pub mod division;
pub mod engine;
pub mod error;
pub mod filter;
pub mod leaderboard;
pub mod pareto;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ProfitabilityEngine;
pub use error::AnalyticsError;
pub use filter::FilterSpec;
pub use report::{
    DivisionSummary, MarginPoint, ParetoAnalysis, ParetoEntry, ProductSummary,
    ProfitabilityReport, SummaryMetrics,
};
