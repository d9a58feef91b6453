use crate::PERCENT_TOLERANCE;
use crate::actions::DUST;
use crate::optimizer::{implied_equity, target_value};
use core_types::{CurrentValues, FixedAssets, TargetPercentages, percentages_of, total_value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The smallest contribution that reaches the targets without selling anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyOnlyPlan {
    pub current_equity: Decimal,
    pub required_contribution: Decimal,
    pub final_equity: Decimal,
    /// Amount to add to each asset. Never negative.
    pub contributions: BTreeMap<String, Decimal>,
    pub final_values: BTreeMap<String, Decimal>,
    pub current_percentages: BTreeMap<String, Decimal>,
    pub final_percentages: BTreeMap<String, Decimal>,
    /// False when some weight cannot be reached without selling, e.g. a
    /// holding with a zero target.
    pub targets_met: bool,
}

/// Grows the portfolio until no asset is above its target, then tops up the rest.
///
/// The equity is the largest `value / (pct / 100)` across assets: below it
/// that asset would have to be sold. Fixed assets get no contribution. Inputs
/// must already be validated.
pub fn plan_buy_only(
    current: &CurrentValues,
    targets: &TargetPercentages,
    fixed: &FixedAssets,
) -> BuyOnlyPlan {
    let current_equity = total_value(current);
    let current_percentages = percentages_of(current);

    let needs_contribution = current.keys().any(|asset| {
        !fixed.contains(asset)
            && current_percentages.get(asset).copied().unwrap_or_default()
                < targets.get(asset).copied().unwrap_or_default()
    });

    let equity = if needs_contribution {
        targets
            .iter()
            .filter_map(|(asset, pct)| {
                implied_equity(current.get(asset).copied().unwrap_or_default(), *pct)
            })
            .max()
            .unwrap_or(current_equity)
            .max(current_equity)
    } else {
        tracing::info!("Every asset is at or above its target; no contribution needed");
        current_equity
    };

    let mut contributions = BTreeMap::new();
    let mut final_values = BTreeMap::new();
    for (asset, value) in current {
        let mut contribution = if fixed.contains(asset) || !needs_contribution {
            Decimal::ZERO
        } else {
            let pct = targets.get(asset).copied().unwrap_or_default();
            (target_value(pct, equity) - *value).max(Decimal::ZERO)
        };
        if contribution < DUST {
            contribution = Decimal::ZERO;
        }
        contributions.insert(asset.clone(), contribution);
        final_values.insert(asset.clone(), *value + contribution);
    }

    let final_equity = total_value(&final_values);
    let final_percentages = percentages_of(&final_values);
    let targets_met = final_percentages.iter().all(|(asset, pct)| {
        (*pct - targets.get(asset).copied().unwrap_or_default()).abs() <= PERCENT_TOLERANCE
    });
    let required_contribution = final_equity - current_equity;

    tracing::info!(
        %required_contribution,
        %final_equity,
        targets_met,
        "Buy-only contribution computed"
    );

    BuyOnlyPlan {
        current_equity,
        required_contribution,
        final_equity,
        contributions,
        final_values,
        current_percentages,
        final_percentages,
        targets_met,
    }
}
