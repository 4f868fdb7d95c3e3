use crate::error::ConfigError;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisSettings, Config, DatasetSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, validates the thresholds, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Optionally, one could add environment variables here as well.
        // .add_source(config::Environment::with_prefix("MERIDIAN"));
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Out-of-range settings fail at startup, not deep inside a pipeline run.
fn validate(config: &Config) -> Result<(), ConfigError> {
    let analysis = &config.analysis;
    if analysis.pareto_threshold <= Decimal::ZERO || analysis.pareto_threshold > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "analysis.pareto_threshold must be in (0, 1], got {}",
            analysis.pareto_threshold
        )));
    }
    if analysis.default_min_margin < Decimal::ZERO || analysis.default_min_margin > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "analysis.default_min_margin must be in [0, 1], got {}",
            analysis.default_min_margin
        )));
    }
    if analysis.default_top_n == 0 {
        return Err(ConfigError::ValidationError(
            "analysis.default_top_n must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::RankKey;
    use rust_decimal_macros::dec;

    fn config(pareto_threshold: Decimal, default_min_margin: Decimal, top_n: usize) -> Config {
        Config {
            dataset: DatasetSettings {
                path: "data/transactions.csv".to_string(),
            },
            analysis: AnalysisSettings {
                pareto_threshold,
                default_top_n: top_n,
                default_rank_key: RankKey::GrossProfit,
                default_min_margin,
            },
        }
    }

    #[test]
    fn accepts_sane_settings() {
        assert!(validate(&config(dec!(0.8), dec!(0), 20)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        assert!(validate(&config(dec!(0), dec!(0), 20)).is_err());
        assert!(validate(&config(dec!(1.5), dec!(0), 20)).is_err());
        assert!(validate(&config(dec!(0.8), dec!(2), 20)).is_err());
        assert!(validate(&config(dec!(0.8), dec!(0), 0)).is_err());
    }
}
