use crate::optimizer::target_value;
use core_types::{CurrentValues, FixedAssets, TargetPercentages};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Actions smaller than this are treated as a hold.
pub const DUST: Decimal = dec!(0.000000001);

/// Per-asset deltas derived from a chosen equity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSummary {
    pub actions: BTreeMap<String, Decimal>,
    pub final_values: BTreeMap<String, Decimal>,
    pub final_percentages: BTreeMap<String, Decimal>,
    /// Sum of positive actions over non-fixed assets.
    pub total_buys: Decimal,
    /// Sum of negated negative actions over non-fixed assets.
    pub total_sells: Decimal,
}

impl ActionSummary {
    /// Positive when external capital is needed, negative when the plan frees cash.
    pub fn net_contribution(&self) -> Decimal {
        self.total_buys - self.total_sells
    }
}

/// Moves every non-fixed asset to `pct / 100 * equity`; fixed assets keep their value.
pub fn calculate_actions(
    current: &CurrentValues,
    targets: &TargetPercentages,
    fixed: &FixedAssets,
    equity: Decimal,
) -> ActionSummary {
    let mut actions = BTreeMap::new();
    let mut final_values = BTreeMap::new();
    let mut total_buys = Decimal::ZERO;
    let mut total_sells = Decimal::ZERO;

    for (asset, value) in current {
        let pct = targets.get(asset).copied().unwrap_or_default();
        let is_fixed = fixed.contains(asset);

        let mut final_value = if is_fixed {
            *value
        } else {
            target_value(pct, equity)
        };
        let mut action = final_value - *value;

        // Snap rounding residue so balanced holdings report an exact hold.
        if action.abs() < DUST {
            action = Decimal::ZERO;
            final_value = *value;
        }

        if !is_fixed {
            if action > Decimal::ZERO {
                total_buys += action;
            } else {
                total_sells -= action;
            }
        }

        actions.insert(asset.clone(), action);
        final_values.insert(asset.clone(), final_value);
    }

    let final_percentages = final_values
        .iter()
        .map(|(asset, value)| {
            let pct = if equity > Decimal::ZERO {
                *value / equity * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            (asset.clone(), pct)
        })
        .collect();

    ActionSummary {
        actions,
        final_values,
        final_percentages,
        total_buys,
        total_sells,
    }
}
