//! # Rebalancer
//!
//! Computes how to move a portfolio onto target percentage weights with as
//! little buying and selling as possible.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O, no shared state. Every call takes immutable maps
//!   and returns fresh values, so calls can run concurrently without
//!   coordination.
//! - **Errors vs. outcomes:** ill-formed input (empty maps, mismatched assets,
//!   impossible fixed assets) is a `RebalanceError`. A plan that needs more
//!   capital than allowed is still returned, with `viable = false`.
//!
//! ## Pipeline
//!
//! `validator` -> `fixed_assets` -> `optimizer` -> `actions` -> `feasibility`.
//!
//! ## Public API
//!
//! - `rebalance`: one-shot optimized rebalance with default settings.
//! - `Rebalancer`: the same pipeline with explicit settings, plus the
//!   fixed-contribution and buy-only planners.

// Declare the modules that constitute this crate.
pub mod actions;
pub mod buy_only;
pub mod contribution;
pub mod error;
pub mod feasibility;
pub mod fixed_assets;
pub mod optimizer;
pub mod validator;

// Re-export the key components to create a clean, public-facing API.
pub use buy_only::BuyOnlyPlan;
pub use contribution::ContributionPlan;
pub use error::{RebalanceError, ValidationError};
pub use optimizer::{EquityChoice, EquitySource, TargetEquityOptimizer};

use configuration::RebalanceSettings;
use core_types::{
    ContributionCap, CurrentValues, FixedAssets, RebalancePlan, TargetPercentages, percentages_of,
    total_value,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Absolute tolerance, in percentage points, for every percentage comparison.
pub const PERCENT_TOLERANCE: Decimal = dec!(0.01);

/// Runs the optimized rebalance with default settings.
pub fn rebalance(
    current: &CurrentValues,
    targets: &TargetPercentages,
    cap: ContributionCap,
    fixed: &FixedAssets,
) -> Result<RebalancePlan, RebalanceError> {
    Rebalancer::default().rebalance(current, targets, cap, fixed)
}

/// Stateless planner configured with `RebalanceSettings`.
#[derive(Debug, Clone)]
pub struct Rebalancer {
    optimizer: TargetEquityOptimizer,
}

impl Default for Rebalancer {
    fn default() -> Self {
        Self {
            optimizer: TargetEquityOptimizer::new(RebalanceSettings::default().sell_weight),
        }
    }
}

impl Rebalancer {
    /// Creates a new `Rebalancer`, rejecting a non-positive `sell_weight`.
    pub fn new(settings: RebalanceSettings) -> Result<Self, RebalanceError> {
        if settings.sell_weight <= Decimal::ZERO {
            return Err(RebalanceError::InvalidSettings(format!(
                "sell_weight must be greater than 0, got {}",
                settings.sell_weight
            )));
        }
        Ok(Self {
            optimizer: TargetEquityOptimizer::new(settings.sell_weight),
        })
    }

    /// Finds the least disruptive target equity and the trades that reach it.
    ///
    /// Fails on ill-formed input. A plan that needs more than `cap` is
    /// returned with `viable = false` and every other field populated.
    #[tracing::instrument(name = "rebalance", skip_all, fields(assets = current.len(), cap = %cap))]
    pub fn rebalance(
        &self,
        current: &CurrentValues,
        targets: &TargetPercentages,
        cap: ContributionCap,
        fixed: &FixedAssets,
    ) -> Result<RebalancePlan, RebalanceError> {
        // --- 1. Validation ---
        validator::validate_inputs(current, targets)?;
        if let Some(limit) = cap.limit() {
            validator::validate_amount("contribution cap", limit)?;
        }
        fixed_assets::check_fixed_assets(current, fixed, targets)?;

        // --- 2. Target equity ---
        let choice = self.optimizer.optimize(current, targets, fixed)?;

        // --- 3. Per-asset actions ---
        let summary = actions::calculate_actions(current, targets, fixed, choice.equity);

        // --- 4. Feasibility against the cap ---
        let verdict = feasibility::check_feasibility(summary.net_contribution(), cap);

        Ok(RebalancePlan {
            current_equity: total_value(current),
            target_equity: choice.equity,
            net_contribution_required: verdict.net_contribution_required,
            total_buys: summary.total_buys,
            total_sells: summary.total_sells,
            actions: summary.actions,
            final_values: summary.final_values,
            current_percentages: percentages_of(current),
            final_percentages: summary.final_percentages,
            fixed_assets: fixed.clone(),
            viable: verdict.viable,
            infeasibility_reason: verdict.infeasibility_reason,
        })
    }

    /// Spreads a known contribution so the portfolio lands on its targets.
    pub fn plan_contribution(
        &self,
        current: &CurrentValues,
        targets: &TargetPercentages,
        contribution: Decimal,
        fixed: &FixedAssets,
    ) -> Result<ContributionPlan, RebalanceError> {
        validator::validate_inputs(current, targets)?;
        validator::validate_amount("contribution", contribution)?;
        validator::checked_total(current)
            .and_then(|total| total.checked_add(contribution))
            .ok_or(ValidationError::Overflow {
                what: "portfolio value plus contribution",
            })?;
        fixed_assets::check_fixed_assets(current, fixed, targets)?;

        Ok(crate::contribution::plan_contribution(
            current,
            targets,
            contribution,
            fixed,
        ))
    }

    /// Computes the smallest contribution that reaches the targets without selling.
    pub fn plan_buy_only(
        &self,
        current: &CurrentValues,
        targets: &TargetPercentages,
        fixed: &FixedAssets,
    ) -> Result<BuyOnlyPlan, RebalanceError> {
        validator::validate_inputs(current, targets)?;
        fixed_assets::check_fixed_assets(current, fixed, targets)?;

        Ok(buy_only::plan_buy_only(current, targets, fixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_sell_weight_is_rejected() {
        let settings = RebalanceSettings {
            sell_weight: dec!(0),
        };
        assert!(matches!(
            Rebalancer::new(settings),
            Err(RebalanceError::InvalidSettings(_))
        ));
    }

    #[test]
    fn contribution_past_decimal_range_is_rejected() {
        let current = [("A".to_string(), Decimal::MAX)].into_iter().collect();
        let targets = [("A".to_string(), dec!(100))].into_iter().collect();
        let result = Rebalancer::default().plan_contribution(
            &current,
            &targets,
            dec!(1),
            &FixedAssets::new(),
        );
        assert!(matches!(
            result,
            Err(RebalanceError::Validation(ValidationError::Overflow { .. }))
        ));
    }

    #[test]
    fn negative_contribution_is_rejected() {
        let current = [("A".to_string(), dec!(10))].into_iter().collect();
        let targets = [("A".to_string(), dec!(100))].into_iter().collect();
        let result = Rebalancer::default().plan_contribution(
            &current,
            &targets,
            dec!(-1),
            &FixedAssets::new(),
        );
        assert!(matches!(
            result,
            Err(RebalanceError::Validation(ValidationError::NegativeAmount { .. }))
        ));
    }
}
