//! Reduction of completed trajectories into a `SimulationResult`
//!
//! Percentiles use linear interpolation between order statistics:
//! `rank = p * (n - 1)` over the ascending-sorted sample, interpolating
//! between the two bracketing values.

use serde::{Deserialize, Serialize};

use crate::params::SimulationParameters;

use super::trajectory::Trajectory;

/// Number of final balances retained for histogram rendering when the run
/// count exceeds it
const DISTRIBUTION_SAMPLE_SIZE: usize = 1_000;

/// Cross-trajectory distribution of one simulated year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// Simulated year (1-indexed)
    pub year: u32,
    pub median_balance: f64,
    pub percentile10_balance: f64,
    pub percentile90_balance: f64,
    pub median_withdrawal: f64,
}

/// Aggregated outcome of a completed run-set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Fraction of trajectories that survived the full horizon, in [0, 1]
    pub success_rate: f64,
    pub median_final_balance: f64,
    pub mean_final_balance: f64,
    pub percentile10: f64,
    pub percentile25: f64,
    pub percentile50: f64,
    pub percentile75: f64,
    pub percentile90: f64,
    /// Per-year cross-trajectory balance/withdrawal distributions
    pub yearly_balances: Vec<YearlyProjection>,
    /// Final balances (full set, or a fixed-size sorted sample for histograms)
    pub final_balance_distribution: Vec<f64>,
    /// Sum of withdrawals across all runs and years
    pub total_withdrawn: f64,
    /// Mean withdrawal per run-year
    pub average_annual_withdrawal: f64,
    /// `1 - success_rate`
    pub probability_of_ruin: f64,
    /// Mean ruin year over failed runs only; None when every run succeeded
    pub years_until_ruin: Option<f64>,
    /// Largest peak-to-trough fractional decline of the *median* yearly
    /// balance path, in [0, 1]
    pub max_drawdown: f64,
    /// Full per-run archive; transient, for visualization only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_runs: Option<Vec<Trajectory>>,
}

impl SimulationResult {
    /// Archive-stripped variant for long-term storage: identical fields minus
    /// the per-run archive.
    pub fn stripped(&self) -> SimulationResult {
        SimulationResult {
            all_runs: None,
            ..self.clone()
        }
    }
}

/// Fold all completed trajectories into the aggregate result.
pub fn aggregate(trajectories: Vec<Trajectory>, params: &SimulationParameters) -> SimulationResult {
    let runs = trajectories.len();
    let horizon = params.time_horizon_years as usize;

    let mut finals: Vec<f64> = trajectories.iter().map(|t| t.final_balance).collect();
    finals.sort_by(|a, b| a.total_cmp(b));

    let successes = trajectories.iter().filter(|t| t.success).count();
    let success_rate = successes as f64 / runs as f64;

    let ruin_years: Vec<u32> = trajectories.iter().filter_map(|t| t.ruin_year).collect();
    let years_until_ruin = if ruin_years.is_empty() {
        None
    } else {
        Some(ruin_years.iter().map(|&y| y as f64).sum::<f64>() / ruin_years.len() as f64)
    };

    let total_withdrawn: f64 = trajectories.iter().map(|t| t.total_withdrawn()).sum();
    let average_annual_withdrawal = total_withdrawn / (runs as f64 * horizon as f64);

    let yearly_balances = yearly_projections(&trajectories, horizon);

    // Drawdown is measured on the median path, the starting balance included,
    // so a decline beginning in year 1 is captured.
    let mut median_path = Vec::with_capacity(horizon + 1);
    median_path.push(params.starting_balance);
    median_path.extend(yearly_balances.iter().map(|y| y.median_balance));
    let max_drawdown = max_drawdown(&median_path);

    let mean_final_balance = finals.iter().sum::<f64>() / runs as f64;

    SimulationResult {
        success_rate,
        median_final_balance: percentile(&finals, 0.50),
        mean_final_balance,
        percentile10: percentile(&finals, 0.10),
        percentile25: percentile(&finals, 0.25),
        percentile50: percentile(&finals, 0.50),
        percentile75: percentile(&finals, 0.75),
        percentile90: percentile(&finals, 0.90),
        yearly_balances,
        final_balance_distribution: distribution_sample(&finals),
        total_withdrawn,
        average_annual_withdrawal,
        probability_of_ruin: 1.0 - success_rate,
        years_until_ruin,
        max_drawdown,
        all_runs: if params.keep_all_runs {
            Some(trajectories)
        } else {
            None
        },
    }
}

fn yearly_projections(trajectories: &[Trajectory], horizon: usize) -> Vec<YearlyProjection> {
    let mut projections = Vec::with_capacity(horizon);
    let mut balances = Vec::with_capacity(trajectories.len());
    let mut withdrawals = Vec::with_capacity(trajectories.len());

    for year_idx in 0..horizon {
        balances.clear();
        withdrawals.clear();
        for t in trajectories {
            balances.push(t.balances[year_idx]);
            withdrawals.push(t.withdrawals[year_idx]);
        }
        balances.sort_by(|a, b| a.total_cmp(b));
        withdrawals.sort_by(|a, b| a.total_cmp(b));

        projections.push(YearlyProjection {
            year: year_idx as u32 + 1,
            median_balance: percentile(&balances, 0.50),
            percentile10_balance: percentile(&balances, 0.10),
            percentile90_balance: percentile(&balances, 0.90),
            median_withdrawal: percentile(&withdrawals, 0.50),
        });
    }

    projections
}

/// Linearly interpolated percentile over an ascending-sorted slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Largest peak-to-trough fractional decline over a balance path.
fn max_drawdown(path: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;
    for &balance in path {
        if balance > peak {
            peak = balance;
        } else if peak > 0.0 {
            worst = worst.max((peak - balance) / peak);
        }
    }
    worst
}

/// Full set when small, otherwise a deterministic stride sample over the
/// sorted finals that preserves the distribution's shape.
fn distribution_sample(sorted_finals: &[f64]) -> Vec<f64> {
    let n = sorted_finals.len();
    if n <= DISTRIBUTION_SAMPLE_SIZE {
        return sorted_finals.to_vec();
    }
    (0..DISTRIBUTION_SAMPLE_SIZE)
        .map(|i| {
            let rank = i as f64 / (DISTRIBUTION_SAMPLE_SIZE - 1) as f64 * (n - 1) as f64;
            sorted_finals[rank.round() as usize]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WithdrawalConfig;
    use approx::assert_relative_eq;

    fn trajectory(balances: Vec<f64>, withdrawals: Vec<f64>) -> Trajectory {
        let final_balance = *balances.last().unwrap();
        let ruin_year = balances
            .iter()
            .position(|&b| b <= 0.0)
            .map(|idx| idx as u32 + 1);
        Trajectory {
            final_balance,
            success: final_balance > 0.0,
            ruin_year,
            balances,
            withdrawals,
        }
    }

    fn params(horizon: u32) -> SimulationParameters {
        let mut p =
            SimulationParameters::new(100.0, WithdrawalConfig::fixed_percentage(0.04));
        p.time_horizon_years = horizon;
        p
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = vec![10.0, 20.0, 30.0, 40.0];
        assert_relative_eq!(percentile(&sorted, 0.0), 10.0);
        assert_relative_eq!(percentile(&sorted, 1.0), 40.0);
        assert_relative_eq!(percentile(&sorted, 0.5), 25.0);
        // rank = 0.25 * 3 = 0.75 -> between 10 and 20
        assert_relative_eq!(percentile(&sorted, 0.25), 17.5);
    }

    #[test]
    fn test_percentiles_ordered() {
        let trajectories: Vec<Trajectory> = (1..=100)
            .map(|i| trajectory(vec![i as f64 * 37.0 % 91.0 + 1.0], vec![4.0]))
            .collect();
        let result = aggregate(trajectories, &params(1));

        assert!(result.percentile10 <= result.percentile25);
        assert!(result.percentile25 <= result.percentile50);
        assert!(result.percentile50 <= result.percentile75);
        assert!(result.percentile75 <= result.percentile90);
        assert_relative_eq!(result.percentile50, result.median_final_balance);
    }

    #[test]
    fn test_ruin_probability_consistent() {
        let mut trajectories = vec![
            trajectory(vec![50.0, 60.0], vec![4.0, 4.0]),
            trajectory(vec![50.0, 0.0], vec![4.0, 4.0]),
            trajectory(vec![0.0, 0.0], vec![4.0, 0.0]),
            trajectory(vec![80.0, 90.0], vec![4.0, 4.0]),
        ];
        trajectories[1].ruin_year = Some(2);
        trajectories[2].ruin_year = Some(1);

        let result = aggregate(trajectories, &params(2));
        assert_relative_eq!(result.success_rate, 0.5);
        assert_relative_eq!(result.probability_of_ruin, 1.0 - result.success_rate);
        // Mean ruin year over failed runs only: (2 + 1) / 2.
        assert_relative_eq!(result.years_until_ruin.unwrap(), 1.5);
    }

    #[test]
    fn test_years_until_ruin_absent_when_all_succeed() {
        let trajectories = vec![
            trajectory(vec![50.0], vec![4.0]),
            trajectory(vec![60.0], vec![4.0]),
        ];
        let result = aggregate(trajectories, &params(1));
        assert!(result.years_until_ruin.is_none());
        assert_relative_eq!(result.probability_of_ruin, 0.0);
    }

    #[test]
    fn test_max_drawdown_on_median_path() {
        // Median path: 100 (start) -> 120 -> 60 -> 90. Worst decline 50%.
        let trajectories = vec![trajectory(vec![120.0, 60.0, 90.0], vec![0.0, 0.0, 0.0])];
        let result = aggregate(trajectories, &params(3));
        assert_relative_eq!(result.max_drawdown, 0.5);
    }

    #[test]
    fn test_yearly_projection_medians() {
        let trajectories = vec![
            trajectory(vec![10.0, 10.0], vec![1.0, 1.0]),
            trajectory(vec![20.0, 30.0], vec![2.0, 2.0]),
            trajectory(vec![30.0, 50.0], vec![3.0, 3.0]),
        ];
        let result = aggregate(trajectories, &params(2));
        assert_eq!(result.yearly_balances.len(), 2);
        assert_eq!(result.yearly_balances[0].year, 1);
        assert_relative_eq!(result.yearly_balances[0].median_balance, 20.0);
        assert_relative_eq!(result.yearly_balances[1].median_balance, 30.0);
        assert_relative_eq!(result.yearly_balances[1].median_withdrawal, 2.0);
    }

    #[test]
    fn test_distribution_sampled_above_cap() {
        let trajectories: Vec<Trajectory> = (0..5_000)
            .map(|i| trajectory(vec![i as f64], vec![0.0]))
            .collect();
        let result = aggregate(trajectories, &params(1));
        assert_eq!(result.final_balance_distribution.len(), 1_000);
        // Stride sample spans the full range.
        assert_relative_eq!(result.final_balance_distribution[0], 0.0);
        assert_relative_eq!(*result.final_balance_distribution.last().unwrap(), 4_999.0);
    }

    #[test]
    fn test_stripped_drops_archive_only() {
        let mut p = params(1);
        p.keep_all_runs = true;
        let trajectories = vec![trajectory(vec![42.0], vec![4.0])];
        let result = aggregate(trajectories, &p);
        assert!(result.all_runs.is_some());

        let stripped = result.stripped();
        assert!(stripped.all_runs.is_none());
        assert_relative_eq!(stripped.success_rate, result.success_rate);
        assert_relative_eq!(stripped.median_final_balance, result.median_final_balance);
    }

    #[test]
    fn test_average_annual_withdrawal() {
        let trajectories = vec![
            trajectory(vec![50.0, 50.0], vec![10.0, 10.0]),
            trajectory(vec![50.0, 50.0], vec![20.0, 20.0]),
        ];
        let result = aggregate(trajectories, &params(2));
        assert_relative_eq!(result.total_withdrawn, 60.0);
        assert_relative_eq!(result.average_annual_withdrawal, 15.0);
    }
}
