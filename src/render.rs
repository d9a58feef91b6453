//! Terminal rendering of plans with `comfy-table`.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::{AssetAction, ContributionCap, Holdings, RebalancePlan};
use rebalancer::{BuyOnlyPlan, ContributionPlan};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}

fn pct(value: Decimal) -> Cell {
    Cell::new(format!("{:.2}%", value)).set_alignment(CellAlignment::Right)
}

fn action_cell(action: AssetAction) -> Cell {
    let cell = Cell::new(action.to_string());
    match action {
        AssetAction::Buy(_) => cell.fg(Color::Green),
        AssetAction::Sell(_) => cell.fg(Color::Red),
        AssetAction::Hold => cell,
        AssetAction::Fixed => cell.fg(Color::Yellow),
    }
}

fn get(map: &BTreeMap<String, Decimal>, asset: &str) -> Decimal {
    map.get(asset).copied().unwrap_or_default()
}

pub fn print_rebalance_plan(plan: &RebalancePlan, holdings: &Holdings, cap: ContributionCap) {
    let mut table = new_table(vec![
        "Asset", "Current", "Current %", "Target %", "Action", "Final", "Final %",
    ]);
    for (asset, current) in &holdings.current {
        let action = plan.action_for(asset).unwrap_or(AssetAction::Hold);
        table.add_row(vec![
            Cell::new(asset),
            money(*current),
            pct(get(&plan.current_percentages, asset)),
            pct(get(&holdings.targets, asset)),
            action_cell(action),
            money(get(&plan.final_values, asset)),
            pct(get(&plan.final_percentages, asset)),
        ]);
    }
    println!("{table}");

    let mut summary = new_table(vec!["Metric", "Value"]);
    summary.add_row(vec![Cell::new("Current equity"), money(plan.current_equity)]);
    summary.add_row(vec![Cell::new("Target equity"), money(plan.target_equity)]);
    summary.add_row(vec![Cell::new("Total buys"), money(plan.total_buys)]);
    summary.add_row(vec![Cell::new("Total sells"), money(plan.total_sells)]);
    summary.add_row(vec![
        Cell::new("Net contribution required"),
        money(plan.net_contribution_required),
    ]);
    summary.add_row(vec![Cell::new("Contribution cap"), Cell::new(cap.to_string())]);
    let verdict = if plan.viable {
        Cell::new("Viable").fg(Color::Green)
    } else {
        Cell::new("Not viable").fg(Color::Red)
    };
    summary.add_row(vec![Cell::new("Status"), verdict]);
    println!("{summary}");

    if let Some(reason) = &plan.infeasibility_reason {
        println!("{reason}");
    }
}

pub fn print_contribution_plan(plan: &ContributionPlan, holdings: &Holdings) {
    let mut table = new_table(vec!["Asset", "Current", "Current %", "Target %", "Action", "Target value"]);
    for (asset, current) in &holdings.current {
        let action = AssetAction::from_delta(get(&plan.actions, asset), holdings.fixed.contains(asset));
        table.add_row(vec![
            Cell::new(asset),
            money(*current),
            pct(get(&plan.current_percentages, asset)),
            pct(get(&holdings.targets, asset)),
            action_cell(action),
            money(get(&plan.target_values, asset)),
        ]);
    }
    println!("{table}");

    let mut summary = new_table(vec!["Metric", "Value"]);
    summary.add_row(vec![Cell::new("Current equity"), money(plan.current_equity)]);
    summary.add_row(vec![Cell::new("Contribution"), money(plan.contribution)]);
    summary.add_row(vec![Cell::new("Total equity"), money(plan.total_equity)]);
    summary.add_row(vec![Cell::new("Total buys"), money(plan.total_buys)]);
    summary.add_row(vec![Cell::new("Total sells"), money(plan.total_sells)]);
    if !plan.balance_gap.is_zero() {
        summary.add_row(vec![
            Cell::new("Unspent or overspent"),
            money(plan.balance_gap).fg(Color::Yellow),
        ]);
    }
    println!("{summary}");
}

pub fn print_buy_only_plan(plan: &BuyOnlyPlan, holdings: &Holdings) {
    let mut table = new_table(vec!["Asset", "Current", "Current %", "Target %", "Buy", "Final", "Final %"]);
    for (asset, current) in &holdings.current {
        let contribution = get(&plan.contributions, asset);
        let buy = if holdings.fixed.contains(asset) {
            action_cell(AssetAction::Fixed)
        } else {
            money(contribution)
        };
        table.add_row(vec![
            Cell::new(asset),
            money(*current),
            pct(get(&plan.current_percentages, asset)),
            pct(get(&holdings.targets, asset)),
            buy,
            money(get(&plan.final_values, asset)),
            pct(get(&plan.final_percentages, asset)),
        ]);
    }
    println!("{table}");

    let mut summary = new_table(vec!["Metric", "Value"]);
    summary.add_row(vec![Cell::new("Current equity"), money(plan.current_equity)]);
    summary.add_row(vec![Cell::new("Required contribution"), money(plan.required_contribution)]);
    summary.add_row(vec![Cell::new("Final equity"), money(plan.final_equity)]);
    let met = if plan.targets_met {
        Cell::new("Yes").fg(Color::Green)
    } else {
        Cell::new("No, some weights need a sale").fg(Color::Yellow)
    };
    summary.add_row(vec![Cell::new("Targets met"), met]);
    println!("{summary}");
}
