use crate::error::ValidationError;
use crate::PERCENT_TOLERANCE;
use core_types::{CurrentValues, TargetPercentages};
use rust_decimal::Decimal;

/// Rejects inputs no planner can work with.
///
/// Both maps must be non-empty, share the same assets, hold non-negative
/// values and percentages in `[0, 100]`, and the percentages must sum to 100
/// within `PERCENT_TOLERANCE`.
pub fn validate_inputs(
    current: &CurrentValues,
    targets: &TargetPercentages,
) -> Result<(), ValidationError> {
    if current.is_empty() {
        return Err(ValidationError::EmptyCurrentValues);
    }
    if targets.is_empty() {
        return Err(ValidationError::EmptyTargets);
    }

    let missing_targets: Vec<String> = current
        .keys()
        .filter(|asset| !targets.contains_key(*asset))
        .cloned()
        .collect();
    let missing_values: Vec<String> = targets
        .keys()
        .filter(|asset| !current.contains_key(*asset))
        .cloned()
        .collect();
    if !missing_targets.is_empty() || !missing_values.is_empty() {
        return Err(ValidationError::AssetMismatch {
            missing_targets,
            missing_values,
        });
    }

    if let Some((asset, value)) = current.iter().find(|(_, value)| **value < Decimal::ZERO) {
        return Err(ValidationError::NegativeValue {
            asset: asset.clone(),
            value: *value,
        });
    }

    if let Some((asset, pct)) = targets
        .iter()
        .find(|(_, pct)| **pct < Decimal::ZERO || **pct > Decimal::ONE_HUNDRED)
    {
        return Err(ValidationError::PercentageOutOfRange {
            asset: asset.clone(),
            pct: *pct,
        });
    }

    let total: Decimal = targets.values().copied().sum();
    if (total - Decimal::ONE_HUNDRED).abs() > PERCENT_TOLERANCE {
        return Err(ValidationError::PercentageSum { total });
    }

    checked_total(current).ok_or(ValidationError::Overflow {
        what: "total portfolio value",
    })?;

    Ok(())
}

/// Sum of the values, or `None` when it does not fit in a `Decimal`.
pub fn checked_total(values: &CurrentValues) -> Option<Decimal> {
    values
        .values()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
}

/// Guards caller-supplied amounts such as a contribution.
pub fn validate_amount(what: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { what, value });
    }
    Ok(())
}
