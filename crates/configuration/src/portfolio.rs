use core_types::AssetEntry;
use rust_decimal::Decimal;
use serde::Deserialize;

/// A portfolio snapshot. This is deserialized from a user-supplied `.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioFile {
    /// Maximum external capital the holder is willing to add. Absent means unbounded.
    #[serde(default)]
    pub contribution_cap: Option<Decimal>,
    pub assets: Vec<AssetEntry>,
}
