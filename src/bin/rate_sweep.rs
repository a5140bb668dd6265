//! Sweep withdrawal rates and report the success rate at each
//!
//! Runs one full seeded simulation per rate in parallel and writes a CSV
//! suitable for plotting a safe-withdrawal-rate curve.

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;

use retirement_sim::{
    run_simulation, HistoricalDataset, PortfolioSnapshot, SimulationParameters, WithdrawalConfig,
};

#[derive(Debug, Parser)]
#[command(name = "rate_sweep", about = "Success-rate sweep over withdrawal rates")]
struct Cli {
    /// Runs per rate point
    #[arg(long, default_value_t = 10_000)]
    runs: u32,

    /// Retirement horizon in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Starting portfolio balance
    #[arg(long, default_value_t = 1_000_000.0)]
    balance: f64,

    /// Lowest withdrawal rate to test
    #[arg(long, default_value_t = 0.025)]
    from: f64,

    /// Highest withdrawal rate to test
    #[arg(long, default_value_t = 0.06)]
    to: f64,

    /// Step between rate points
    #[arg(long, default_value_t = 0.0025)]
    step: f64,

    /// RNG seed shared by every rate point
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output CSV path
    #[arg(long, default_value = "rate_sweep_output.csv")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let portfolio = PortfolioSnapshot::classic_three_fund(cli.balance);
    let dataset = HistoricalDataset::default_us();

    let mut rates = Vec::new();
    let mut rate = cli.from;
    while rate <= cli.to + 1e-9 {
        rates.push(rate);
        rate += cli.step;
    }

    println!(
        "Sweeping {} rate points from {:.2}% to {:.2}% ({} runs each)...",
        rates.len(),
        cli.from * 100.0,
        cli.to * 100.0,
        cli.runs
    );
    let start = Instant::now();

    let results: Vec<_> = rates
        .par_iter()
        .map(|&rate| {
            let mut params = SimulationParameters::new(
                cli.balance,
                WithdrawalConfig::fixed_percentage(rate),
            );
            params.number_of_runs = cli.runs;
            params.time_horizon_years = cli.years;
            params.seed = Some(cli.seed);
            run_simulation(&params, &portfolio, Some(&dataset)).map(|result| (rate, result))
        })
        .collect::<Result<_, _>>()?;

    println!("Sweep complete in {:?}\n", start.elapsed());

    println!("{:>8} {:>10} {:>10} {:>16} {:>16}", "Rate", "Success", "Ruin", "Median Final", "P10 Final");
    println!("{}", "-".repeat(66));
    for (rate, result) in &results {
        println!(
            "{:>7.2}% {:>9.1}% {:>9.1}% {:>16.0} {:>16.0}",
            rate * 100.0,
            result.success_rate * 100.0,
            result.probability_of_ruin * 100.0,
            result.median_final_balance,
            result.percentile10
        );
    }

    let mut file = File::create(&cli.output).with_context(|| format!("creating {}", cli.output))?;
    writeln!(file, "Rate,SuccessRate,ProbabilityOfRuin,MedianFinal,MeanFinal,P10,P90,MaxDrawdown")?;
    for (rate, result) in &results {
        writeln!(
            file,
            "{:.4},{:.4},{:.4},{:.2},{:.2},{:.2},{:.2},{:.4}",
            rate,
            result.success_rate,
            result.probability_of_ruin,
            result.median_final_balance,
            result.mean_final_balance,
            result.percentile10,
            result.percentile90,
            result.max_drawdown
        )?;
    }
    println!("\nOutput written to {}", cli.output);

    Ok(())
}
