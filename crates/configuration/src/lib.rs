use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod portfolio;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use portfolio::PortfolioFile;
pub use settings::{Config, OutputFormat, OutputSettings, RebalanceSettings};

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `REBALANCE__REBALANCE__SELL_WEIGHT=4`.
const ENV_PREFIX: &str = "REBALANCE";

/// Loads the application settings.
///
/// Reads `path` (or `config.toml` when `None`), then layers environment
/// variables on top. A missing default file is not an error: every setting
/// has a default. An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path)
            .format(config::FileFormat::Toml)
            .required(true),
        None => config::File::from(Path::new(DEFAULT_CONFIG_FILE))
            .format(config::FileFormat::Toml)
            .required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate_settings(&config)?;

    tracing::debug!(sell_weight = %config.rebalance.sell_weight, "Loaded settings");
    Ok(config)
}

/// Loads a portfolio snapshot from a TOML file.
pub fn load_portfolio(path: &Path) -> Result<PortfolioFile, ConfigError> {
    let builder = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
        )
        .build()?;

    let portfolio = builder.try_deserialize::<PortfolioFile>()?;

    if portfolio.assets.is_empty() {
        return Err(ConfigError::InvalidPortfolio {
            path: path.display().to_string(),
            reason: "no assets listed".to_string(),
        });
    }
    if let Some(cap) = portfolio.contribution_cap {
        if cap < Decimal::ZERO {
            return Err(ConfigError::InvalidPortfolio {
                path: path.display().to_string(),
                reason: format!("contribution_cap must not be negative, got {}", cap),
            });
        }
    }

    tracing::debug!(
        path = %path.display(),
        assets = portfolio.assets.len(),
        "Loaded portfolio"
    );
    Ok(portfolio)
}

fn validate_settings(config: &Config) -> Result<(), ConfigError> {
    if config.rebalance.sell_weight <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "rebalance.sell_weight must be greater than 0, got {}",
            config.rebalance.sell_weight
        )));
    }
    Ok(())
}
