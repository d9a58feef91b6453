use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{OutputFormat, load_config, load_portfolio};
use core_types::{ContributionCap, Holdings};
use rebalancer::Rebalancer;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the rebalance CLI.
fn main() -> Result<()> {
    // A .env file is optional; it may carry RUST_LOG or REBALANCE__* overrides.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load settings")?;
    let format = cli.format.unwrap_or(config.output.format);
    let rebalancer =
        Rebalancer::new(config.rebalance).context("Invalid rebalance settings")?;

    match cli.command {
        Commands::Optimize(args) => handle_optimize(args, &rebalancer, format),
        Commands::Contribute(args) => handle_contribute(args, &rebalancer, format),
        Commands::BuyOnly(args) => handle_buy_only(args, &rebalancer, format),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Rebalances a portfolio onto its target weights with as little trading as possible.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file. Defaults to ./config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format. Overrides `[output] format` from the settings file.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the least disruptive target equity and the trades that reach it.
    Optimize(OptimizeArgs),
    /// Spread a known contribution so the portfolio lands on its targets.
    Contribute(ContributeArgs),
    /// Compute the smallest contribution that reaches the targets without selling.
    BuyOnly(BuyOnlyArgs),
}

#[derive(Parser)]
struct PortfolioArgs {
    /// Portfolio snapshot (TOML) with the current values and target weights.
    #[arg(long)]
    portfolio: PathBuf,

    /// Asset that must not be traded. Repeatable; adds to the file's `fixed` flags.
    #[arg(long = "fixed", value_name = "ASSET")]
    fixed: Vec<String>,
}

#[derive(Parser)]
struct OptimizeArgs {
    #[command(flatten)]
    portfolio: PortfolioArgs,

    /// Maximum external capital available. Overrides `contribution_cap` from the file.
    #[arg(long)]
    cap: Option<Decimal>,
}

#[derive(Parser)]
struct ContributeArgs {
    #[command(flatten)]
    portfolio: PortfolioArgs,

    /// Amount of new capital to invest.
    #[arg(long)]
    amount: Decimal,
}

#[derive(Parser)]
struct BuyOnlyArgs {
    #[command(flatten)]
    portfolio: PortfolioArgs,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_optimize(args: OptimizeArgs, rebalancer: &Rebalancer, format: OutputFormat) -> Result<()> {
    let (holdings, file_cap) = read_holdings(&args.portfolio)?;
    let cap = ContributionCap::from_option(args.cap.or(file_cap))
        .context("Invalid contribution cap")?;

    let plan = rebalancer
        .rebalance(&holdings.current, &holdings.targets, cap, &holdings.fixed)
        .context("Rebalance failed")?;

    match format {
        OutputFormat::Table => render::print_rebalance_plan(&plan, &holdings, cap),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

fn handle_contribute(
    args: ContributeArgs,
    rebalancer: &Rebalancer,
    format: OutputFormat,
) -> Result<()> {
    let (holdings, _) = read_holdings(&args.portfolio)?;

    let plan = rebalancer
        .plan_contribution(&holdings.current, &holdings.targets, args.amount, &holdings.fixed)
        .context("Contribution planning failed")?;

    match format {
        OutputFormat::Table => render::print_contribution_plan(&plan, &holdings),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

fn handle_buy_only(args: BuyOnlyArgs, rebalancer: &Rebalancer, format: OutputFormat) -> Result<()> {
    let (holdings, _) = read_holdings(&args.portfolio)?;

    let plan = rebalancer
        .plan_buy_only(&holdings.current, &holdings.targets, &holdings.fixed)
        .context("Buy-only planning failed")?;

    match format {
        OutputFormat::Table => render::print_buy_only_plan(&plan, &holdings),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

/// Loads the portfolio file and merges the `--fixed` flags into it.
fn read_holdings(args: &PortfolioArgs) -> Result<(Holdings, Option<Decimal>)> {
    let file = load_portfolio(&args.portfolio)
        .with_context(|| format!("Failed to read portfolio {}", args.portfolio.display()))?;

    let mut holdings = Holdings::from_entries(&file.assets).context("Invalid portfolio")?;
    holdings
        .fixed
        .extend(args.fixed.iter().map(|asset| asset.trim().to_string()));

    tracing::info!(
        assets = holdings.current.len(),
        fixed = holdings.fixed.len(),
        "Portfolio loaded"
    );
    Ok((holdings, file.contribution_cap))
}
