use crate::error::RebalanceError;
use crate::PERCENT_TOLERANCE;
use core_types::{CurrentValues, FixedAssets, TargetPercentages, total_value};
use rust_decimal::Decimal;

/// Checks that a fixed-asset set can be honoured at the requested targets.
///
/// On success returns the percentage left for the variable assets
/// (`100 - sum of fixed targets`). An empty set always passes with 100.
pub fn check_fixed_assets(
    current: &CurrentValues,
    fixed: &FixedAssets,
    targets: &TargetPercentages,
) -> Result<Decimal, RebalanceError> {
    if fixed.is_empty() {
        return Ok(Decimal::ONE_HUNDRED);
    }

    // --- 1. Every fixed asset must be known ---
    for asset in fixed {
        if !current.contains_key(asset) {
            return Err(RebalanceError::UnknownAsset {
                asset: asset.clone(),
                missing_from: "current values",
            });
        }
        if !targets.contains_key(asset) {
            return Err(RebalanceError::UnknownAsset {
                asset: asset.clone(),
                missing_from: "target percentages",
            });
        }
    }

    // --- 2. Their current share must already match their target share ---
    let total = total_value(current);
    let fixed_value: Decimal = fixed.iter().map(|asset| current[asset]).sum();
    let fixed_current_pct = if total > Decimal::ZERO {
        fixed_value / total * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let fixed_target_pct: Decimal = fixed.iter().map(|asset| targets[asset]).sum();

    if (fixed_current_pct - fixed_target_pct).abs() > PERCENT_TOLERANCE {
        return Err(RebalanceError::FixedAssetMismatch {
            fixed_current_pct,
            fixed_target_pct,
        });
    }

    // Individually as well: swapped shares pass the combined check.
    for asset in fixed {
        let current_pct = if total > Decimal::ZERO {
            current[asset] / total * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        let target_pct = targets[asset];
        if (current_pct - target_pct).abs() > PERCENT_TOLERANCE {
            return Err(RebalanceError::FixedAssetMismatch {
                fixed_current_pct: current_pct,
                fixed_target_pct: target_pct,
            });
        }
    }

    // --- 3. What is left must be exactly what the variable assets ask for ---
    let available_pct = Decimal::ONE_HUNDRED - fixed_target_pct;
    let required_pct: Decimal = targets
        .iter()
        .filter(|(asset, _)| !fixed.contains(*asset))
        .map(|(_, pct)| *pct)
        .sum();

    if (required_pct - available_pct).abs() > PERCENT_TOLERANCE {
        return Err(RebalanceError::VariableAllocationMismatch {
            required_pct,
            available_pct,
        });
    }

    tracing::debug!(
        fixed = ?fixed,
        %fixed_target_pct,
        %available_pct,
        "Fixed assets are compatible with targets"
    );
    Ok(available_pct)
}
