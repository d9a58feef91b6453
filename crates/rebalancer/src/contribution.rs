use crate::PERCENT_TOLERANCE;
use crate::actions::DUST;
use crate::optimizer::target_value;
use core_types::{CurrentValues, FixedAssets, TargetPercentages, percentages_of, total_value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How to spend a known contribution so the portfolio lands on its targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub current_equity: Decimal,
    pub contribution: Decimal,
    /// `current_equity + contribution`.
    pub total_equity: Decimal,
    pub target_values: BTreeMap<String, Decimal>,
    /// Signed per-asset amounts: positive buys, negative sells, zero for fixed assets.
    pub actions: BTreeMap<String, Decimal>,
    pub total_buys: Decimal,
    pub total_sells: Decimal,
    pub current_percentages: BTreeMap<String, Decimal>,
    /// `total_buys - total_sells - contribution`. Non-zero means the plan
    /// does not spend exactly the contribution.
    pub balance_gap: Decimal,
}

/// Computes target values for `current_equity + contribution`.
///
/// Fixed assets keep their value. The remaining equity is split between the
/// variable assets in proportion to their targets, so they still add up to
/// the total even when the fixed assets' value moved off their share.
/// Inputs must already be validated.
pub fn plan_contribution(
    current: &CurrentValues,
    targets: &TargetPercentages,
    contribution: Decimal,
    fixed: &FixedAssets,
) -> ContributionPlan {
    let current_equity = total_value(current);
    let total_equity = current_equity + contribution;

    let target_values: BTreeMap<String, Decimal> = if fixed.is_empty() {
        targets
            .iter()
            .map(|(asset, pct)| (asset.clone(), target_value(*pct, total_equity)))
            .collect()
    } else {
        let fixed_value: Decimal = fixed
            .iter()
            .filter_map(|asset| current.get(asset))
            .copied()
            .sum();
        let available_equity = total_equity - fixed_value;
        let variable_pct: Decimal = targets
            .iter()
            .filter(|(asset, _)| !fixed.contains(*asset))
            .map(|(_, pct)| *pct)
            .sum();

        targets
            .iter()
            .map(|(asset, pct)| {
                let value = if fixed.contains(asset) {
                    current.get(asset).copied().unwrap_or_default()
                } else if variable_pct > Decimal::ZERO {
                    *pct / variable_pct * available_equity
                } else {
                    Decimal::ZERO
                };
                (asset.clone(), value)
            })
            .collect()
    };

    let mut actions = BTreeMap::new();
    let mut total_buys = Decimal::ZERO;
    let mut total_sells = Decimal::ZERO;
    for (asset, value) in current {
        let mut action = if fixed.contains(asset) {
            Decimal::ZERO
        } else {
            target_values.get(asset).copied().unwrap_or_default() - *value
        };
        if action.abs() < DUST {
            action = Decimal::ZERO;
        }
        if action > Decimal::ZERO {
            total_buys += action;
        } else {
            total_sells -= action;
        }
        actions.insert(asset.clone(), action);
    }

    let balance_gap = total_buys - total_sells - contribution;
    if balance_gap.abs() > PERCENT_TOLERANCE {
        tracing::warn!(
            net = %(total_buys - total_sells),
            %contribution,
            "Buys minus sells do not match the contribution"
        );
    }

    ContributionPlan {
        current_equity,
        contribution,
        total_equity,
        target_values,
        actions,
        total_buys,
        total_sells,
        current_percentages: percentages_of(current),
        balance_gap,
    }
}
