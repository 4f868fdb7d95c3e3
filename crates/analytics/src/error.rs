use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid Pareto threshold {0}: must be greater than 0 and at most 1")]
    InvalidThreshold(Decimal),
}
