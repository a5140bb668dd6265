//! Retirement Simulator CLI
//!
//! Command-line interface for running Monte Carlo withdrawal simulations

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use retirement_sim::{
    PortfolioSnapshot, ScheduledIncome, SimulationParameters, SimulationRunner, WithdrawalConfig,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    FixedPercentage,
    DynamicPercentage,
    Guardrails,
    FixedDollar,
}

#[derive(Debug, Parser)]
#[command(name = "retirement_sim", about = "Monte Carlo retirement withdrawal simulation")]
struct Cli {
    /// Number of simulated trajectories
    #[arg(long, default_value_t = 10_000)]
    runs: u32,

    /// Retirement horizon in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Starting portfolio balance
    #[arg(long, default_value_t = 1_000_000.0)]
    balance: f64,

    /// Withdrawal strategy
    #[arg(long, value_enum, default_value = "fixed-percentage")]
    strategy: StrategyArg,

    /// Annual withdrawal rate (percentage strategies)
    #[arg(long, default_value_t = 0.04)]
    rate: f64,

    /// Annual withdrawal amount (fixed-dollar strategy)
    #[arg(long, default_value_t = 40_000.0)]
    amount: f64,

    /// Assumed annual inflation rate
    #[arg(long, default_value_t = 0.025)]
    inflation: f64,

    /// Use parametric sampling instead of historical bootstrap
    #[arg(long)]
    parametric: bool,

    /// Bootstrap block length in years (preserves serial correlation)
    #[arg(long)]
    block_years: Option<usize>,

    /// RNG seed for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Age at the start of year 1 (enables scheduled income)
    #[arg(long)]
    retirement_age: Option<u8>,

    /// Annual Social Security benefit (COLA), if any
    #[arg(long)]
    social_security: Option<f64>,

    /// Claiming age for Social Security
    #[arg(long, default_value_t = 67)]
    social_security_age: u8,

    /// Historical returns CSV (defaults to the embedded 1928-2023 US dataset)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Write per-year projections to this CSV file
    #[arg(long, default_value = "projection_output.csv")]
    output: PathBuf,

    /// Print the full result as JSON instead of the summary table
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let withdrawal = match cli.strategy {
        StrategyArg::FixedPercentage => WithdrawalConfig::fixed_percentage(cli.rate),
        StrategyArg::DynamicPercentage => {
            WithdrawalConfig::dynamic_percentage(cli.rate, None, None)
        }
        StrategyArg::Guardrails => WithdrawalConfig::guardrails(cli.rate, 0.03, 0.06, 0.10),
        StrategyArg::FixedDollar => WithdrawalConfig::fixed_dollar(cli.amount, true),
    };

    let mut params = SimulationParameters::new(cli.balance, withdrawal);
    params.number_of_runs = cli.runs;
    params.time_horizon_years = cli.years;
    params.inflation_rate = cli.inflation;
    params.use_bootstrap = !cli.parametric;
    params.bootstrap_block_years = cli.block_years;
    params.seed = cli.seed;
    params.retirement_age = cli.retirement_age;
    if let Some(benefit) = cli.social_security {
        params.scheduled_incomes.push(ScheduledIncome {
            name: "Social Security".into(),
            annual_amount: benefit,
            start_age: cli.social_security_age,
            end_age: None,
            inflation_adjusted: true,
        });
    }

    let portfolio = PortfolioSnapshot::classic_three_fund(cli.balance);
    let runner = match &cli.data {
        Some(path) => SimulationRunner::from_csv_path(portfolio, path)
            .with_context(|| format!("loading historical data from {}", path.display()))?,
        None => SimulationRunner::new(portfolio),
    };

    let start = Instant::now();
    let result = runner.run(&params)?;
    let elapsed = start.elapsed();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result.stripped())?);
        return Ok(());
    }

    println!("Retirement Simulator v0.1.0");
    println!("===========================\n");
    if let Some((from, to)) = runner.dataset().and_then(|d| d.span()) {
        println!("Historical dataset: {}-{} ({} years)", from, to, to - from + 1);
    }
    println!(
        "{} runs x {} years, {} @ {:.2}% in {:.2?}\n",
        cli.runs,
        cli.years,
        params.withdrawal.strategy.as_str(),
        cli.rate * 100.0,
        elapsed
    );

    println!("Outcome:");
    println!("  Success rate:       {:.1}%", result.success_rate * 100.0);
    println!("  Probability of ruin: {:.1}%", result.probability_of_ruin * 100.0);
    if let Some(years) = result.years_until_ruin {
        println!("  Avg years to ruin:  {:.1} (failed runs only)", years);
    }
    println!("  Median final:       ${:.0}", result.median_final_balance);
    println!("  Mean final:         ${:.0}", result.mean_final_balance);
    println!("  Max drawdown:       {:.1}% (median path)", result.max_drawdown * 100.0);
    println!("  Avg annual draw:    ${:.0}", result.average_annual_withdrawal);

    println!("\nFinal balance percentiles:");
    println!(
        "  p10=${:.0}  p25=${:.0}  p50=${:.0}  p75=${:.0}  p90=${:.0}",
        result.percentile10,
        result.percentile25,
        result.percentile50,
        result.percentile75,
        result.percentile90
    );

    println!("\nPer-year projection (first 10 years):");
    println!(
        "{:>5} {:>16} {:>16} {:>16} {:>14}",
        "Year", "P10 Balance", "Median Balance", "P90 Balance", "Median WD"
    );
    println!("{}", "-".repeat(72));
    for row in result.yearly_balances.iter().take(10) {
        println!(
            "{:>5} {:>16.0} {:>16.0} {:>16.0} {:>14.0}",
            row.year,
            row.percentile10_balance,
            row.median_balance,
            row.percentile90_balance,
            row.median_withdrawal
        );
    }
    if result.yearly_balances.len() > 10 {
        println!("... ({} more years)", result.yearly_balances.len() - 10);
    }

    // Write full per-year series to CSV
    let mut file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    writeln!(file, "Year,P10_Balance,Median_Balance,P90_Balance,Median_Withdrawal")?;
    for row in &result.yearly_balances {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2}",
            row.year,
            row.percentile10_balance,
            row.median_balance,
            row.percentile90_balance,
            row.median_withdrawal
        )?;
    }
    println!("\nFull per-year projections written to: {}", cli.output.display());

    Ok(())
}
