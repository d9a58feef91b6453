use core_types::{
    AssetAction, ContributionCap, CurrentValues, FixedAssets, TargetPercentages, total_value,
};
use rebalancer::{RebalanceError, Rebalancer, ValidationError, rebalance};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn values(pairs: &[(&str, Decimal)]) -> CurrentValues {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn targets(pairs: &[(&str, Decimal)]) -> TargetPercentages {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn fixed(assets: &[&str]) -> FixedAssets {
    assets.iter().map(|a| a.to_string()).collect()
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}

#[test]
fn tiny_overweight_asset_is_trimmed_while_the_large_one_is_held() {
    let current = values(&[("A", dec!(10)), ("B", dec!(10)), ("C", dec!(50))]);
    let target = targets(&[("A", dec!(1)), ("B", dec!(50)), ("C", dec!(49))]);

    let plan = rebalance(&current, &target, ContributionCap::Unbounded, &FixedAssets::new()).unwrap();

    assert!(plan.viable);
    assert_close(plan.target_equity, dec!(102.04), dec!(0.01));
    assert_close(plan.actions["A"], dec!(-8.98), dec!(0.1));
    assert_close(plan.actions["B"], dec!(41.02), dec!(0.1));
    assert_eq!(plan.actions["C"], dec!(0));
    assert_eq!(plan.action_for("C"), Some(AssetAction::Hold));
    assert_close(plan.net_contribution_required, dec!(32.04), dec!(0.01));
    assert_close(plan.total_sells, dec!(8.98), dec!(0.01));
    assert_close(plan.total_buys, dec!(41.02), dec!(0.01));
}

#[test]
fn balanced_portfolio_needs_nothing() {
    let current = values(&[("A", dec!(30)), ("B", dec!(70))]);
    let target = targets(&[("A", dec!(30)), ("B", dec!(70))]);

    let plan = rebalance(&current, &target, ContributionCap::Unbounded, &FixedAssets::new()).unwrap();

    assert_eq!(plan.target_equity, dec!(100));
    assert!(plan.is_balanced());
    assert_eq!(plan.net_contribution_required, dec!(0));
    assert!(plan.viable);
}

#[test]
fn fixed_asset_off_its_share_is_rejected() {
    let current = values(&[("ITSA4", dec!(2000)), ("PETR4", dec!(3000)), ("VALE3", dec!(1000))]);
    let target = targets(&[("ITSA4", dec!(50)), ("PETR4", dec!(30)), ("VALE3", dec!(20))]);

    let result = rebalance(&current, &target, ContributionCap::Unbounded, &fixed(&["ITSA4"]));

    match result {
        Err(RebalanceError::FixedAssetMismatch {
            fixed_current_pct,
            fixed_target_pct,
        }) => {
            assert_close(fixed_current_pct, dec!(33.33), dec!(0.01));
            assert_eq!(fixed_target_pct, dec!(50));
        }
        other => panic!("expected FixedAssetMismatch, got {:?}", other),
    }
}

#[test]
fn insufficient_cap_is_reported_not_raised() {
    let current = values(&[("Ações", dec!(1000)), ("RendaFixa", dec!(4000))]);
    let target = targets(&[("Ações", dec!(80)), ("RendaFixa", dec!(20))]);

    let plan = rebalance(
        &current,
        &target,
        ContributionCap::Bounded(dec!(500)),
        &FixedAssets::new(),
    )
    .unwrap();

    assert!(!plan.viable);
    let reason = plan.infeasibility_reason.as_deref().unwrap();
    assert!(reason.contains("500.00"), "reason was: {}", reason);
    assert!(plan.net_contribution_required > dec!(500));
    assert!(reason.contains(&format!("{:.2}", plan.net_contribution_required)));

    // Diagnostics stay populated.
    assert_eq!(plan.target_equity, dec!(20000));
    assert_eq!(plan.actions["Ações"], dec!(15000));
    assert_eq!(plan.final_percentages["Ações"], dec!(80));
}

#[test]
fn compatible_fixed_asset_stays_put() {
    let current = values(&[
        ("Domestic", dec!(5000)),
        ("International", dec!(1000)),
        ("Bonds", dec!(3000)),
        ("REITs", dec!(1000)),
    ]);
    let target = targets(&[
        ("Domestic", dec!(30)),
        ("International", dec!(25)),
        ("Bonds", dec!(35)),
        ("REITs", dec!(10)),
    ]);

    let plan = rebalance(&current, &target, ContributionCap::Unbounded, &fixed(&["REITs"])).unwrap();

    assert_eq!(plan.target_equity, dec!(10000));
    assert_eq!(plan.actions["REITs"], dec!(0));
    assert_eq!(plan.action_for("REITs"), Some(AssetAction::Fixed));
    assert_eq!(plan.final_values["REITs"], dec!(1000));
    assert_eq!(plan.actions["Domestic"], dec!(-2000));
    assert_eq!(plan.actions["International"], dec!(1500));
    assert_eq!(plan.actions["Bonds"], dec!(500));
    assert_eq!(plan.net_contribution_required, dec!(0));
}

#[test]
fn large_overweight_holding_is_grown_around() {
    let current = values(&[
        ("Domestic", dec!(5000)),
        ("International", dec!(1000)),
        ("Bonds", dec!(3000)),
        ("REITs", dec!(1000)),
    ]);
    let target = targets(&[
        ("Domestic", dec!(30)),
        ("International", dec!(25)),
        ("Bonds", dec!(35)),
        ("REITs", dec!(10)),
    ]);

    let plan = rebalance(&current, &target, ContributionCap::Bounded(dec!(1000)), &FixedAssets::new())
        .unwrap();

    // Domestic at 30% holds 5000, so nothing is sold and the rest is bought up.
    assert_close(plan.target_equity, dec!(16666.67), dec!(0.01));
    assert_eq!(plan.total_sells, dec!(0));
    assert_eq!(plan.actions["Domestic"], dec!(0));
    assert!(!plan.viable);
}

#[test]
fn validation_errors_surface_before_any_work() {
    let current = values(&[("A", dec!(10))]);
    let target = targets(&[("A", dec!(90))]);
    assert_eq!(
        rebalance(&current, &target, ContributionCap::Unbounded, &FixedAssets::new()),
        Err(RebalanceError::Validation(ValidationError::PercentageSum { total: dec!(90) }))
    );

    let target = targets(&[("A", dec!(100))]);
    assert!(matches!(
        rebalance(&current, &target, ContributionCap::Unbounded, &fixed(&["Ghost"])),
        Err(RebalanceError::UnknownAsset { .. })
    ));

    assert!(matches!(
        rebalance(&current, &target, ContributionCap::Bounded(dec!(-1)), &FixedAssets::new()),
        Err(RebalanceError::Validation(ValidationError::NegativeAmount { .. }))
    ));
}

#[test]
fn zero_target_asset_is_liquidated() {
    let current = values(&[("Keep", dec!(90)), ("Drop", dec!(10))]);
    let target = targets(&[("Keep", dec!(100)), ("Drop", dec!(0))]);

    let plan = rebalance(&current, &target, ContributionCap::Unbounded, &FixedAssets::new()).unwrap();

    assert_eq!(plan.target_equity, dec!(90));
    assert_eq!(plan.final_values["Drop"], dec!(0));
    assert_eq!(plan.actions["Drop"], dec!(-10));
    assert_eq!(plan.net_contribution_required, dec!(0));
}

#[test]
fn contribution_and_buy_only_planners_share_validation() {
    let rebalancer = Rebalancer::default();
    let current = values(&[("A", dec!(10)), ("B", dec!(10))]);
    let bad = targets(&[("A", dec!(10)), ("C", dec!(90))]);

    assert!(matches!(
        rebalancer.plan_contribution(&current, &bad, dec!(100), &FixedAssets::new()),
        Err(RebalanceError::Validation(ValidationError::AssetMismatch { .. }))
    ));
    assert!(matches!(
        rebalancer.plan_buy_only(&current, &bad, &FixedAssets::new()),
        Err(RebalanceError::Validation(ValidationError::AssetMismatch { .. }))
    ));
}

#[test]
fn buy_only_tops_up_a_bond_heavy_portfolio() {
    let current = values(&[("Stocks", dec!(1000)), ("Bonds", dec!(4000))]);
    let target = targets(&[("Stocks", dec!(80)), ("Bonds", dec!(20))]);

    let plan = Rebalancer::default()
        .plan_buy_only(&current, &target, &FixedAssets::new())
        .unwrap();

    assert_eq!(plan.required_contribution, dec!(15000));
    assert_eq!(plan.contributions["Bonds"], dec!(0));
    assert!(plan.targets_met);
}

#[test]
fn fixed_assets_with_swapped_shares_are_rejected() {
    let current = values(&[("A", dec!(10)), ("B", dec!(40)), ("C", dec!(50))]);
    let target = targets(&[("A", dec!(40)), ("B", dec!(10)), ("C", dec!(50))]);

    assert!(matches!(
        rebalance(&current, &target, ContributionCap::Unbounded, &fixed(&["A", "B"])),
        Err(RebalanceError::FixedAssetMismatch { .. })
    ));
}

#[test]
fn two_fixed_assets_keep_values_adding_up() {
    let current = values(&[("A", dec!(10)), ("B", dec!(40)), ("C", dec!(30)), ("D", dec!(20))]);
    let target = targets(&[("A", dec!(10)), ("B", dec!(40)), ("C", dec!(20)), ("D", dec!(30))]);

    let plan = rebalance(&current, &target, ContributionCap::Unbounded, &fixed(&["A", "B"])).unwrap();

    assert!(plan.viable);
    assert_eq!(plan.target_equity, dec!(100));
    assert_eq!(total_value(&plan.final_values), plan.target_equity);
    let pct_sum: Decimal = plan.final_percentages.values().copied().sum();
    assert_eq!(pct_sum, dec!(100));
    assert_eq!(plan.actions["A"], dec!(0));
    assert_eq!(plan.actions["B"], dec!(0));
    assert_eq!(plan.actions["C"], dec!(-10));
    assert_eq!(plan.actions["D"], dec!(10));
}

#[test]
fn values_near_the_decimal_limit_do_not_panic() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
    let current = values(&[("A", huge), ("B", dec!(1))]);
    let target = targets(&[("A", dec!(50)), ("B", dec!(50))]);

    let plan = rebalance(&current, &target, ContributionCap::Unbounded, &FixedAssets::new()).unwrap();
    assert_eq!(plan.target_equity, huge * dec!(2));
    assert_eq!(plan.total_sells, dec!(0));

    let too_big = values(&[("A", Decimal::MAX), ("B", Decimal::MAX)]);
    assert!(matches!(
        rebalance(&too_big, &target, ContributionCap::Unbounded, &FixedAssets::new()),
        Err(RebalanceError::Validation(ValidationError::Overflow { .. }))
    ));
}
