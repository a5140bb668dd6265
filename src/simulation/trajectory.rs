//! Single-trajectory simulation
//!
//! One trajectory walks the configured horizon year by year: sample a
//! (return, inflation) pair, grow the balance, take the net withdrawal,
//! record the year. A balance that reaches zero is ruin: it stays at exactly
//! zero for every remaining year and no further withdrawals are drawn.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::market::ReturnSampler;
use crate::params::SimulationParameters;

use super::income::income_for_year;
use super::withdrawal::WithdrawalPolicy;

/// Completed state of one simulated retirement path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// End-of-year balances, index 0 = year 1
    pub balances: Vec<f64>,
    /// Net withdrawals taken each year, index 0 = year 1
    pub withdrawals: Vec<f64>,
    /// Balance at the final year (0.0 for ruined paths)
    pub final_balance: f64,
    /// Balance survived the full horizon
    pub success: bool,
    /// First year the balance hit zero, if any (1-indexed)
    pub ruin_year: Option<u32>,
}

impl Trajectory {
    pub fn total_withdrawn(&self) -> f64 {
        self.withdrawals.iter().sum()
    }
}

/// Run one full trajectory with the given sampler and RNG stream.
pub fn simulate_trajectory<R: Rng>(
    params: &SimulationParameters,
    sampler: &mut ReturnSampler<'_>,
    rng: &mut R,
) -> Trajectory {
    let horizon = params.time_horizon_years;
    let mut balances = Vec::with_capacity(horizon as usize);
    let mut withdrawals = Vec::with_capacity(horizon as usize);

    let mut balance = params.starting_balance;
    let mut policy = WithdrawalPolicy::new(&params.withdrawal, params.starting_balance);
    let mut ruin_year = None;

    for year in 1..=horizon {
        if ruin_year.is_some() {
            // Ruined portfolios stay at exactly zero; nothing more is drawn.
            balances.push(0.0);
            withdrawals.push(0.0);
            continue;
        }

        let sampled = sampler.next_year(rng);
        balance *= 1.0 + sampled.portfolio_return;

        let income = income_for_year(params, year);
        let net = policy.net_for_year(year, balance, sampled.inflation, income);
        balance -= net;

        if balance <= 0.0 {
            balance = 0.0;
            ruin_year = Some(year);
        }

        balances.push(balance);
        withdrawals.push(net);
    }

    Trajectory {
        final_balance: balance,
        success: balance > 0.0,
        ruin_year,
        balances,
        withdrawals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{HistoricalDataset, HistoricalYear, PortfolioSnapshot};
    use crate::params::{SimulationParameters, WithdrawalConfig};
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// A dataset with one flat year makes bootstrap sampling deterministic.
    fn flat_dataset(annual_return: f64, inflation: f64) -> HistoricalDataset {
        HistoricalDataset::new(vec![HistoricalYear {
            year: 2000,
            stocks: annual_return,
            bonds: annual_return,
            cash: annual_return,
            inflation,
        }])
    }

    fn run(
        params: &SimulationParameters,
        dataset: &HistoricalDataset,
        seed: u64,
    ) -> Trajectory {
        let portfolio = PortfolioSnapshot::classic_three_fund(params.starting_balance);
        let mut sampler =
            ReturnSampler::for_parameters(params, &portfolio, Some(dataset)).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        simulate_trajectory(params, &mut sampler, &mut rng)
    }

    #[test]
    fn test_growth_applied_before_withdrawal() {
        let mut params =
            SimulationParameters::new(1_000_000.0, WithdrawalConfig::fixed_percentage(0.04));
        params.time_horizon_years = 1;
        params.withdrawal.inflation_adjusted = false;
        let dataset = flat_dataset(0.10, 0.0);

        let trajectory = run(&params, &dataset, 1);
        // 1m * 1.10 - 40k
        assert_relative_eq!(trajectory.balances[0], 1_060_000.0);
        assert_relative_eq!(trajectory.withdrawals[0], 40_000.0);
        assert!(trajectory.success);
    }

    #[test]
    fn test_ruin_floor_holds_forever() {
        let mut params =
            SimulationParameters::new(50_000.0, WithdrawalConfig::fixed_dollar(40_000.0, false));
        params.time_horizon_years = 10;
        let dataset = flat_dataset(0.0, 0.0);

        let trajectory = run(&params, &dataset, 3);
        assert_eq!(trajectory.ruin_year, Some(2));
        assert!(!trajectory.success);
        assert_eq!(trajectory.final_balance, 0.0);
        for year_idx in 1..10 {
            assert_eq!(trajectory.balances[year_idx], 0.0);
        }
        // No withdrawals after ruin.
        for year_idx in 2..10 {
            assert_eq!(trajectory.withdrawals[year_idx], 0.0);
        }
    }

    #[test]
    fn test_exact_depletion_is_ruin() {
        // 100k, 0% return, withdraw exactly 100k in year 1.
        let mut params =
            SimulationParameters::new(100_000.0, WithdrawalConfig::fixed_dollar(100_000.0, false));
        params.time_horizon_years = 3;
        let dataset = flat_dataset(0.0, 0.0);

        let trajectory = run(&params, &dataset, 9);
        assert_eq!(trajectory.ruin_year, Some(1));
        assert_eq!(trajectory.balances, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_series_lengths_match_horizon() {
        let mut params =
            SimulationParameters::new(1_000_000.0, WithdrawalConfig::fixed_percentage(0.04));
        params.time_horizon_years = 25;
        let dataset = flat_dataset(0.05, 0.02);

        let trajectory = run(&params, &dataset, 11);
        assert_eq!(trajectory.balances.len(), 25);
        assert_eq!(trajectory.withdrawals.len(), 25);
    }

    #[test]
    fn test_income_offsets_withdrawal() {
        let mut params =
            SimulationParameters::new(1_000_000.0, WithdrawalConfig::fixed_percentage(0.04));
        params.time_horizon_years = 1;
        params.retirement_age = Some(67);
        params.scheduled_incomes = vec![crate::params::ScheduledIncome {
            name: "Social Security".into(),
            annual_amount: 30_000.0,
            start_age: 67,
            end_age: None,
            inflation_adjusted: true,
        }];
        let dataset = flat_dataset(0.0, 0.0);

        let trajectory = run(&params, &dataset, 5);
        // Gross 40k minus 30k income.
        assert_relative_eq!(trajectory.withdrawals[0], 10_000.0);
        assert_relative_eq!(trajectory.balances[0], 990_000.0);
    }
}
