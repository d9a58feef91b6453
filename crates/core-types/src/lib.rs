pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AssetAction, ContributionCap};
pub use error::CoreError;
pub use structs::{
    AssetEntry, CurrentValues, FixedAssets, Holdings, RebalancePlan, TargetPercentages,
    percentages_of, total_value,
};
