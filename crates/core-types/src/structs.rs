use crate::enums::AssetAction;
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Asset id -> current monetary value.
pub type CurrentValues = BTreeMap<String, Decimal>;

/// Asset id -> target weight in percent (0-100).
pub type TargetPercentages = BTreeMap<String, Decimal>;

/// Assets whose value must not change.
pub type FixedAssets = BTreeSet<String>;

/// A single holding as it appears in a portfolio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub value: Decimal,
    pub target_pct: Decimal,
    #[serde(default)]
    pub fixed: bool,
}

/// The three inputs the planners consume, split out of a list of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holdings {
    pub current: CurrentValues,
    pub targets: TargetPercentages,
    pub fixed: FixedAssets,
}

impl Holdings {
    /// Splits entries into value, target and fixed maps. Asset names must be unique.
    pub fn from_entries(entries: &[AssetEntry]) -> Result<Self, CoreError> {
        let mut holdings = Holdings::default();
        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(CoreError::InvalidInput(
                    "asset name".to_string(),
                    "must not be blank".to_string(),
                ));
            }
            if holdings.current.insert(name.to_string(), entry.value).is_some() {
                return Err(CoreError::DuplicateAsset(name.to_string()));
            }
            holdings.targets.insert(name.to_string(), entry.target_pct);
            if entry.fixed {
                holdings.fixed.insert(name.to_string());
            }
        }
        Ok(holdings)
    }
}

/// Sum of all values in a map.
pub fn total_value(values: &BTreeMap<String, Decimal>) -> Decimal {
    values.values().copied().sum()
}

/// Each value's share of the total, in percent. All zero when the total is zero.
pub fn percentages_of(values: &BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    let total = total_value(values);
    values
        .iter()
        .map(|(asset, value)| {
            let pct = if total > Decimal::ZERO {
                *value / total * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            (asset.clone(), pct)
        })
        .collect()
}

/// The outcome of an optimized rebalance.
///
/// Always fully populated, including when `viable` is false, so callers can
/// show what the plan would have required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub current_equity: Decimal,
    pub target_equity: Decimal,
    /// External capital to inject. Clamped at zero for viable plans.
    pub net_contribution_required: Decimal,
    pub total_buys: Decimal,
    pub total_sells: Decimal,
    /// Signed per-asset amounts: positive buys, negative sells.
    pub actions: BTreeMap<String, Decimal>,
    pub final_values: BTreeMap<String, Decimal>,
    pub current_percentages: BTreeMap<String, Decimal>,
    pub final_percentages: BTreeMap<String, Decimal>,
    pub fixed_assets: FixedAssets,
    pub viable: bool,
    pub infeasibility_reason: Option<String>,
}

impl RebalancePlan {
    /// The action for one asset, or `None` if the asset is not in the plan.
    pub fn action_for(&self, asset: &str) -> Option<AssetAction> {
        self.actions
            .get(asset)
            .map(|delta| AssetAction::from_delta(*delta, self.fixed_assets.contains(asset)))
    }

    /// True when every action is zero.
    pub fn is_balanced(&self) -> bool {
        self.actions.values().all(|delta| delta.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(name: &str, value: Decimal, target_pct: Decimal, fixed: bool) -> AssetEntry {
        AssetEntry { name: name.to_string(), value, target_pct, fixed }
    }

    #[test]
    fn holdings_split_entries() {
        let holdings = Holdings::from_entries(&[
            entry("ITSA4", dec!(2000), dec!(50), true),
            entry("PETR4", dec!(3000), dec!(50), false),
        ])
        .unwrap();

        assert_eq!(holdings.current["ITSA4"], dec!(2000));
        assert_eq!(holdings.targets["PETR4"], dec!(50));
        assert!(holdings.fixed.contains("ITSA4"));
        assert!(!holdings.fixed.contains("PETR4"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = Holdings::from_entries(&[
            entry("A", dec!(1), dec!(50), false),
            entry(" A ", dec!(2), dec!(50), false),
        ]);
        assert_eq!(result, Err(CoreError::DuplicateAsset("A".to_string())));
    }

    #[test]
    fn percentages_of_zero_total_are_zero() {
        let values: CurrentValues = [("A".to_string(), dec!(0)), ("B".to_string(), dec!(0))]
            .into_iter()
            .collect();
        assert!(percentages_of(&values).values().all(|p| p.is_zero()));
    }

    #[test]
    fn percentages_of_split_total() {
        let values: CurrentValues = [("A".to_string(), dec!(25)), ("B".to_string(), dec!(75))]
            .into_iter()
            .collect();
        let pct = percentages_of(&values);
        assert_eq!(pct["A"], dec!(25));
        assert_eq!(pct["B"], dec!(75));
    }
}
