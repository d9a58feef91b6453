use rust_decimal::Decimal;
use thiserror::Error;

/// Structurally ill-formed input. Raised before any computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Current values must not be empty.")]
    EmptyCurrentValues,

    #[error("Target percentages must not be empty.")]
    EmptyTargets,

    #[error(
        "Assets in current values and target percentages must match. Missing targets: {missing_targets:?}, missing values: {missing_values:?}"
    )]
    AssetMismatch {
        missing_targets: Vec<String>,
        missing_values: Vec<String>,
    },

    #[error("Target percentages must sum to 100%, got {total}%")]
    PercentageSum { total: Decimal },

    #[error("Current value of '{asset}' must not be negative, got {value}")]
    NegativeValue { asset: String, value: Decimal },

    #[error("Target percentage of '{asset}' must be between 0 and 100, got {pct}")]
    PercentageOutOfRange { asset: String, pct: Decimal },

    #[error("{what} must not be negative, got {value}")]
    NegativeAmount { what: &'static str, value: Decimal },

    #[error("{what} is too large to compute with")]
    Overflow { what: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RebalanceError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fixed asset '{asset}' not found in {missing_from}")]
    UnknownAsset {
        asset: String,
        missing_from: &'static str,
    },

    #[error(
        "Fixed assets occupy {fixed_current_pct:.2}% of the portfolio but their target is {fixed_target_pct:.2}%"
    )]
    FixedAssetMismatch {
        fixed_current_pct: Decimal,
        fixed_target_pct: Decimal,
    },

    #[error(
        "Variable assets need {required_pct:.2}% but only {available_pct:.2}% is available after fixed assets"
    )]
    VariableAllocationMismatch {
        required_pct: Decimal,
        available_pct: Decimal,
    },

    #[error("Rebalance settings are invalid: {0}")]
    InvalidSettings(String),
}
