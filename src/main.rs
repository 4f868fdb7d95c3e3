use analytics::{FilterSpec, ParetoAnalysis, ProfitabilityEngine, ProfitabilityReport};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use configuration::Config;
use core_types::{RankKey, Transaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Meridian profitability dashboard.
fn main() {
    // Logging is opt-in via RUST_LOG; the tables themselves go to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Load the application configuration
    let config = match configuration::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Leaderboard(args) => handle_leaderboard(args, &config),
        Commands::Divisions(args) => handle_divisions(args, &config),
        Commands::Pareto(args) => handle_pareto(args, &config),
        Commands::Diagnostics(args) => handle_diagnostics(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Product-line profitability and margin performance, in the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full dashboard: KPIs, leaderboard, divisions, and Pareto.
    Report(ReportArgs),
    /// Rank products by a selectable metric.
    Leaderboard(LeaderboardArgs),
    /// Compare divisions and flag revenue/profit imbalance.
    Divisions(DivisionsArgs),
    /// Profit-concentration curve and the products that make the threshold.
    Pareto(ParetoArgs),
    /// List the most expensive order lines and their margins.
    Diagnostics(DiagnosticsArgs),
}

/// Filter controls shared by every subcommand. All criteria combine with AND.
#[derive(Args)]
struct FilterArgs {
    /// Start of the order-date range, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the order-date range, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Division to include; repeat the flag to include several.
    #[arg(long = "division")]
    divisions: Vec<String>,

    /// Minimum aggregated product margin as a fraction in [0, 1].
    #[arg(long)]
    min_margin: Option<Decimal>,

    /// Case-insensitive substring to match against product names.
    #[arg(long)]
    search: Option<String>,

    /// Path to the transactions CSV, overriding the configured one.
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Emit the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LeaderboardArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Metric to rank by (defaults to the configured one).
    #[arg(long, value_enum)]
    sort_key: Option<RankKey>,

    /// Number of products to show (defaults to the configured one).
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Args)]
struct DivisionsArgs {
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args)]
struct ParetoArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Cumulative-profit threshold in (0, 1] (defaults to the configured one).
    #[arg(long)]
    threshold: Option<Decimal>,
}

#[derive(Args)]
struct DiagnosticsArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Number of order lines to show (defaults to the configured one).
    #[arg(long)]
    top: Option<usize>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads the dataset named by `--data` or the configuration.
fn load_rows(filter: &FilterArgs, config: &Config) -> anyhow::Result<Vec<Transaction>> {
    let path = filter
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.dataset.path));
    Ok(dataset::load_transactions_file(path)?)
}

/// Translates the shared CLI flags into the engine's filter specification.
fn build_spec(filter: &FilterArgs, config: &Config) -> FilterSpec {
    FilterSpec {
        start_date: filter.from,
        end_date: filter.to,
        divisions: if filter.divisions.is_empty() {
            None
        } else {
            Some(filter.divisions.clone())
        },
        min_margin: filter
            .min_margin
            .unwrap_or(config.analysis.default_min_margin),
        search: filter.search.clone(),
    }
}

fn build_engine(threshold: Option<Decimal>, config: &Config) -> anyhow::Result<ProfitabilityEngine> {
    let threshold = threshold.unwrap_or(config.analysis.pareto_threshold);
    Ok(ProfitabilityEngine::new(threshold)?)
}

fn run_report(
    filter: &FilterArgs,
    threshold: Option<Decimal>,
    config: &Config,
) -> anyhow::Result<ProfitabilityReport> {
    let rows = load_rows(filter, config)?;
    let spec = build_spec(filter, config);
    let engine = build_engine(threshold, config)?;
    Ok(engine.run(&rows, &spec)?)
}

fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let report = run_report(&args.filter, None, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Profitability Overview");
    println!("{}", summary_table(&report));
    println!("\nProduct Profitability Leaderboard");
    println!("{}", leaderboard_table(&report, config.analysis.default_top_n));
    println!("\nDivision Performance");
    println!("{}", divisions_table(&report));
    println!("\nProfit Concentration (Pareto)");
    println!("{}", pareto_table(&report.pareto));
    print_concentration(&report.pareto);
    Ok(())
}

fn handle_leaderboard(args: LeaderboardArgs, config: &Config) -> anyhow::Result<()> {
    let report = run_report(&args.filter, None, config)?;
    let key = args.sort_key.unwrap_or(config.analysis.default_rank_key);
    let limit = args.top.unwrap_or(config.analysis.default_top_n);
    let ranked = analytics::leaderboard::top(&report.products, key, Some(limit));

    let mut table = numeric_table(vec![
        "#", "Product", "Division", "Revenue", "Profit", "Units", "Margin", "Profit/Unit",
        "Revenue Share", "Profit Share",
    ]);
    for (position, product) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&product.product),
            Cell::new(&product.division),
            money_cell(product.total_sales),
            money_cell(product.total_profit),
            Cell::new(product.total_units).set_alignment(CellAlignment::Right),
            pct_cell(product.gross_margin_pct),
            money_opt_cell(product.profit_per_unit),
            pct_cell(product.revenue_contribution_pct),
            pct_cell(product.profit_contribution_pct),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_divisions(args: DivisionsArgs, config: &Config) -> anyhow::Result<()> {
    let report = run_report(&args.filter, None, config)?;
    println!("{}", divisions_table(&report));
    Ok(())
}

fn handle_pareto(args: ParetoArgs, config: &Config) -> anyhow::Result<()> {
    let report = run_report(&args.filter, args.threshold, config)?;
    println!("{}", pareto_table(&report.pareto));
    print_concentration(&report.pareto);
    Ok(())
}

fn handle_diagnostics(args: DiagnosticsArgs, config: &Config) -> anyhow::Result<()> {
    let rows = load_rows(&args.filter, config)?;
    let spec = build_spec(&args.filter, config);
    let engine = build_engine(None, config)?;
    let points = engine.diagnostics(&rows, &spec)?;
    let limit = args.top.unwrap_or(config.analysis.default_top_n);

    let mut table = numeric_table(vec!["Product", "Cost", "Margin"]);
    for point in points.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&point.product),
            money_cell(point.cost),
            pct_cell(Some(point.gross_margin_pct)),
        ]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn numeric_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

fn money_cell(value: Decimal) -> Cell {
    Cell::new(format!("${value:.2}")).set_alignment(CellAlignment::Right)
}

fn money_opt_cell(value: Option<Decimal>) -> Cell {
    match value {
        Some(value) => money_cell(value),
        None => Cell::new("n/a").set_alignment(CellAlignment::Right),
    }
}

/// Ratios are carried as fractions; scale to percent only here.
fn pct_cell(value: Option<Decimal>) -> Cell {
    let text = match value {
        Some(value) => format!("{:.2}%", value * dec!(100)),
        None => "n/a".to_string(),
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn summary_table(report: &ProfitabilityReport) -> Table {
    let summary = &report.summary;
    let mut table = numeric_table(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Transactions"),
        Cell::new(summary.row_count).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Products"),
        Cell::new(summary.product_count).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![Cell::new("Total Revenue"), money_cell(summary.total_sales)]);
    table.add_row(vec![Cell::new("Total Profit"), money_cell(summary.total_profit)]);
    table.add_row(vec![
        Cell::new("Units Sold"),
        Cell::new(summary.total_units).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Gross Margin"),
        pct_cell(summary.gross_margin_pct),
    ]);
    table.add_row(vec![
        Cell::new("Avg Gross Margin (per line)"),
        pct_cell(summary.mean_row_margin),
    ]);
    table
}

fn leaderboard_table(report: &ProfitabilityReport, limit: usize) -> Table {
    let mut table = numeric_table(vec![
        "#", "Product", "Division", "Revenue", "Profit", "Units", "Margin", "Profit Share",
    ]);
    // `report.products` is already in default leaderboard order.
    for (position, product) in report.products.iter().take(limit).enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&product.product),
            Cell::new(&product.division),
            money_cell(product.total_sales),
            money_cell(product.total_profit),
            Cell::new(product.total_units).set_alignment(CellAlignment::Right),
            pct_cell(product.gross_margin_pct),
            pct_cell(product.profit_contribution_pct),
        ]);
    }
    table
}

fn divisions_table(report: &ProfitabilityReport) -> Table {
    let mut table = numeric_table(vec![
        "Division", "Revenue", "Profit", "Margin", "Revenue Rank", "Profit Rank", "Divergence",
    ]);
    for division in &report.divisions {
        table.add_row(vec![
            Cell::new(&division.division),
            money_cell(division.revenue),
            money_cell(division.profit),
            pct_cell(division.gross_margin_pct),
            Cell::new(division.revenue_rank).set_alignment(CellAlignment::Right),
            Cell::new(division.profit_rank).set_alignment(CellAlignment::Right),
            Cell::new(division.rank_divergence).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn pareto_table(pareto: &ParetoAnalysis) -> Table {
    let mut table = numeric_table(vec![
        "Rank", "Product", "Profit", "Cumulative Profit", "Cumulative %",
    ]);
    for entry in &pareto.entries {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.product),
            money_cell(entry.total_profit),
            money_cell(entry.cumulative_profit),
            pct_cell(Some(entry.cumulative_pct)),
        ]);
    }
    table
}

fn print_concentration(pareto: &ParetoAnalysis) {
    match pareto.concentration_count {
        Some(count) => println!(
            "{count} of {} products deliver {:.0}% of filtered profit",
            pareto.entries.len(),
            pareto.threshold * dec!(100)
        ),
        None => println!(
            "Profit concentration is undefined for this filter (total profit is not positive)"
        ),
    }
}
