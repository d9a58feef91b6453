use core_types::ContributionCap;
use rust_decimal::Decimal;

/// The verdict on whether a plan fits the contribution budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Feasibility {
    pub viable: bool,
    /// Clamped at zero when viable; the raw requirement otherwise.
    pub net_contribution_required: Decimal,
    pub infeasibility_reason: Option<String>,
}

/// Compares the net external capital a plan needs against the cap.
///
/// A net seller is reported as needing zero capital: surplus sale proceeds
/// are not handed back to the holder.
pub fn check_feasibility(net_contribution: Decimal, cap: ContributionCap) -> Feasibility {
    match cap.limit() {
        Some(limit) if !cap.allows(net_contribution) => {
            let reason = format!(
                "Required contribution ({:.2}) exceeds available contribution ({:.2})",
                net_contribution, limit
            );
            tracing::warn!(%net_contribution, %limit, "Rebalance plan is not viable");
            Feasibility {
                viable: false,
                net_contribution_required: net_contribution,
                infeasibility_reason: Some(reason),
            }
        }
        _ => Feasibility {
            viable: true,
            net_contribution_required: net_contribution.max(Decimal::ZERO),
            infeasibility_reason: None,
        },
    }
}
