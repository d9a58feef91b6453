use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the external capital a plan may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionCap {
    Bounded(Decimal),
    #[default]
    Unbounded,
}

impl ContributionCap {
    /// Builds a bounded cap, rejecting negative amounts.
    pub fn bounded(amount: Decimal) -> Result<Self, CoreError> {
        if amount < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "contribution_cap".to_string(),
                format!("must not be negative, got {}", amount),
            ));
        }
        Ok(Self::Bounded(amount))
    }

    /// `None` maps to `Unbounded`.
    pub fn from_option(amount: Option<Decimal>) -> Result<Self, CoreError> {
        match amount {
            Some(amount) => Self::bounded(amount),
            None => Ok(Self::Unbounded),
        }
    }

    /// Returns true if `required` fits under the cap.
    pub fn allows(&self, required: Decimal) -> bool {
        match self {
            ContributionCap::Bounded(cap) => required <= *cap,
            ContributionCap::Unbounded => true,
        }
    }

    pub fn limit(&self) -> Option<Decimal> {
        match self {
            ContributionCap::Bounded(cap) => Some(*cap),
            ContributionCap::Unbounded => None,
        }
    }
}

impl fmt::Display for ContributionCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributionCap::Bounded(cap) => write!(f, "{:.2}", cap),
            ContributionCap::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// What a plan asks the holder to do with a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum AssetAction {
    Buy(Decimal),
    Sell(Decimal),
    Hold,
    Fixed,
}

impl AssetAction {
    /// Classifies a signed delta: positive buys, negative sells.
    pub fn from_delta(delta: Decimal, is_fixed: bool) -> Self {
        if is_fixed {
            AssetAction::Fixed
        } else if delta.is_zero() {
            AssetAction::Hold
        } else if delta.is_sign_positive() {
            AssetAction::Buy(delta)
        } else {
            AssetAction::Sell(delta.abs())
        }
    }
}

impl fmt::Display for AssetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetAction::Buy(amount) => write!(f, "Buy {:.2}", amount),
            AssetAction::Sell(amount) => write!(f, "Sell {:.2}", amount),
            AssetAction::Hold => write!(f, "Hold"),
            AssetAction::Fixed => write!(f, "Fixed"),
        }
    }
}
