use crate::error::{RebalanceError, ValidationError};
use core_types::{CurrentValues, FixedAssets, TargetPercentages, total_value};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Where the chosen target equity came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquitySource {
    /// Pinned by a fixed asset: the largest equity any fixed asset demands.
    FixedAsset(String),
    /// Picked by scoring the candidate equities.
    CandidateSearch,
}

/// One evaluated target equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquityCandidate {
    pub equity: Decimal,
    /// Total amount bought across assets to reach `equity`.
    pub buys: Decimal,
    /// Total amount sold across assets to reach `equity`.
    pub sells: Decimal,
    /// `sell_weight * sells + buys`. Lower is less disruptive.
    pub score: Decimal,
}

impl EquityCandidate {
    /// True when the sells cover the buys and no external capital is needed.
    pub fn is_self_funding(&self) -> bool {
        self.sells >= self.buys
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityChoice {
    pub equity: Decimal,
    pub source: EquitySource,
    pub self_funded: bool,
}

/// Picks the total portfolio value every other quantity is derived from.
///
/// With fixed assets the equity is forced: a fixed asset keeps its value, so
/// it only sits at its target weight when `equity = value / (pct / 100)`.
/// All fixed assets must hold at once, so the largest such equity wins.
///
/// Without fixed assets, every asset's implied equity plus the current total
/// is a candidate. Each is scored by how much buying and selling it implies,
/// with selling weighted by `sell_weight`. The score is convex and piecewise
/// linear in the equity with kinks exactly at the implied equities, so the
/// best candidate is the global optimum.
#[derive(Debug, Clone)]
pub struct TargetEquityOptimizer {
    sell_weight: Decimal,
}

impl TargetEquityOptimizer {
    pub fn new(sell_weight: Decimal) -> Self {
        Self { sell_weight }
    }

    pub fn optimize(
        &self,
        current: &CurrentValues,
        targets: &TargetPercentages,
        fixed: &FixedAssets,
    ) -> Result<EquityChoice, RebalanceError> {
        if let Some((asset, equity)) = fixed_equity(current, targets, fixed) {
            let self_funded = self
                .evaluate(current, targets, equity)
                .is_some_and(|evaluated| evaluated.is_self_funding());
            tracing::info!(%equity, binding_asset = %asset, "Target equity pinned by fixed asset");
            return Ok(EquityChoice {
                equity,
                source: EquitySource::FixedAsset(asset),
                self_funded,
            });
        }

        let best = self.search(current, targets).ok_or(ValidationError::Overflow {
            what: "every candidate equity's trade volume",
        })?;
        tracing::info!(
            equity = %best.equity,
            buys = %best.buys,
            sells = %best.sells,
            self_funded = best.is_self_funding(),
            "Target equity chosen by candidate search"
        );
        Ok(EquityChoice {
            equity: best.equity,
            source: EquitySource::CandidateSearch,
            self_funded: best.is_self_funding(),
        })
    }

    /// Scores every candidate and returns the cheapest, smaller equity first on ties.
    ///
    /// Candidates whose score does not fit in a `Decimal` are skipped; `None`
    /// when that leaves nothing.
    pub fn search(
        &self,
        current: &CurrentValues,
        targets: &TargetPercentages,
    ) -> Option<EquityCandidate> {
        let current_total = total_value(current);

        targets
            .iter()
            .filter_map(|(asset, pct)| {
                implied_equity(current.get(asset).copied().unwrap_or_default(), *pct)
            })
            .chain(std::iter::once(current_total))
            .sorted()
            .dedup()
            .filter_map(|equity| {
                let candidate = self.evaluate(current, targets, equity);
                match &candidate {
                    Some(candidate) => tracing::debug!(
                        equity = %candidate.equity,
                        buys = %candidate.buys,
                        sells = %candidate.sells,
                        score = %candidate.score,
                        "Evaluated candidate equity"
                    ),
                    None => tracing::debug!(%equity, "Candidate equity overflows, skipped"),
                }
                candidate
            })
            .min_by(|a, b| match a.score.cmp(&b.score) {
                Ordering::Equal => a.equity.cmp(&b.equity),
                other => other,
            })
    }

    /// Buys, sells and score of moving every asset to its target at `equity`.
    /// `None` if any of them overflows.
    pub fn evaluate(
        &self,
        current: &CurrentValues,
        targets: &TargetPercentages,
        equity: Decimal,
    ) -> Option<EquityCandidate> {
        let (buys, sells) = targets.iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(buys, sells), (asset, pct)| {
                let value = current.get(asset).copied().unwrap_or_default();
                let delta = target_value(*pct, equity).checked_sub(value)?;
                if delta > Decimal::ZERO {
                    Some((buys.checked_add(delta)?, sells))
                } else {
                    Some((buys, sells.checked_sub(delta)?))
                }
            },
        )?;

        let score = self.sell_weight.checked_mul(sells)?.checked_add(buys)?;
        Some(EquityCandidate {
            equity,
            buys,
            sells,
            score,
        })
    }
}

/// The equity at which `value` is exactly `pct` percent of the total.
/// `None` for a zero target, which no finite equity satisfies.
pub fn implied_equity(value: Decimal, pct: Decimal) -> Option<Decimal> {
    if pct <= Decimal::ZERO {
        return None;
    }
    value.checked_div(pct / Decimal::ONE_HUNDRED)
}

/// The value an asset with target `pct` should have at `equity`.
pub fn target_value(pct: Decimal, equity: Decimal) -> Decimal {
    pct / Decimal::ONE_HUNDRED * equity
}

/// The largest equity demanded by any fixed asset with a non-zero target.
fn fixed_equity(
    current: &CurrentValues,
    targets: &TargetPercentages,
    fixed: &FixedAssets,
) -> Option<(String, Decimal)> {
    fixed
        .iter()
        .filter_map(|asset| {
            let value = current.get(asset).copied()?;
            let pct = targets.get(asset).copied()?;
            implied_equity(value, pct).map(|equity| (asset.clone(), equity))
        })
        .max_by(|a, b| a.1.cmp(&b.1))
}
