use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rebalance: RebalanceSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Contains the tuning parameters for the target equity search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RebalanceSettings {
    /// How much more a unit of selling costs than a unit of buying when
    /// candidate equities are compared. 9 means selling is nine times as
    /// disruptive, so only small over-weight positions get trimmed.
    #[serde(default = "default_sell_weight")]
    pub sell_weight: Decimal,
}

fn default_sell_weight() -> Decimal {
    dec!(9)
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        Self {
            sell_weight: default_sell_weight(),
        }
    }
}

/// Controls how the CLI prints plans.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
