//! Run-set orchestration: batching, parallel execution, progress, cancellation
//!
//! The simulation itself is the pure function [`run_simulation`]; the
//! [`SimulationRunner`] wraps it with pre-loaded inputs, fixed-size batches
//! that bound peak memory, per-batch progress reporting, and cooperative
//! cancellation. Every trajectory's RNG stream is derived from
//! `(master_seed, run_index)` with a SplitMix64 mix, so batch size and
//! execution order never affect a seeded result.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{DatasetError, SimulationError};
use crate::market::{loader, HistoricalDataset, PortfolioSnapshot, ReturnSampler};
use crate::params::SimulationParameters;
use crate::simulation::{aggregate, simulate_trajectory, SimulationResult, Trajectory};

/// Trajectories per batch; ~1,250 keeps peak memory bounded and yields eight
/// progress ticks on a default 10,000-run set.
pub const DEFAULT_BATCH_SIZE: u32 = 1_250;

/// Progress callback: `(completed_runs, total_runs)`, invoked after each batch
pub type ProgressFn<'p> = &'p (dyn Fn(u32, u32) + Sync);

/// SplitMix64 finalizer; bijective 64-bit mixer
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Independent, deterministic RNG stream for one run.
///
/// The double mix decorrelates adjacent run indices and adjacent master
/// seeds; the derivation depends on nothing but its two arguments.
pub fn rng_for_run(master_seed: u64, run_index: u64) -> SmallRng {
    SmallRng::seed_from_u64(splitmix64(master_seed ^ splitmix64(run_index)))
}

/// Run a complete simulation as a pure function of its inputs.
///
/// Validates parameters (rejecting with the full list of violations),
/// executes every trajectory, and aggregates. No progress reporting, no
/// cancellation; the [`SimulationRunner`] layers those on top.
pub fn run_simulation(
    params: &SimulationParameters,
    portfolio: &PortfolioSnapshot,
    dataset: Option<&HistoricalDataset>,
) -> Result<SimulationResult, SimulationError> {
    let master_seed = check_inputs(params, portfolio, dataset)?;
    let trajectories = simulate_range(params, portfolio, dataset, master_seed, 0, params.number_of_runs)?;
    Ok(aggregate(trajectories, params))
}

/// Validate parameters and dataset availability; returns the master seed.
fn check_inputs(
    params: &SimulationParameters,
    portfolio: &PortfolioSnapshot,
    dataset: Option<&HistoricalDataset>,
) -> Result<u64, SimulationError> {
    let violations = params.validate(portfolio);
    if !violations.is_empty() {
        return Err(SimulationError::InvalidParameters(violations));
    }

    // Dataset problems are fatal before any trajectory starts.
    if params.use_bootstrap && dataset.map_or(true, |d| d.is_empty()) {
        return Err(DatasetError::Empty.into());
    }

    Ok(params.seed.unwrap_or_else(|| rand::thread_rng().gen()))
}

/// Simulate a contiguous range of run indices in parallel.
fn simulate_range(
    params: &SimulationParameters,
    portfolio: &PortfolioSnapshot,
    dataset: Option<&HistoricalDataset>,
    master_seed: u64,
    start: u32,
    end: u32,
) -> Result<Vec<Trajectory>, SimulationError> {
    (start..end)
        .into_par_iter()
        .map(|run_index| {
            let mut rng = rng_for_run(master_seed, run_index as u64);
            let mut sampler = ReturnSampler::for_parameters(params, portfolio, dataset)?;
            Ok(simulate_trajectory(params, &mut sampler, &mut rng))
        })
        .collect()
}

/// Pre-loaded simulation runner
///
/// Holds the portfolio snapshot and (optionally) the historical dataset so
/// many run-sets can execute without re-reading CSV files.
///
/// # Example
/// ```ignore
/// let runner = SimulationRunner::new(PortfolioSnapshot::classic_three_fund(1_000_000.0));
/// let result = runner.run(&params)?;
/// ```
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    portfolio: PortfolioSnapshot,
    dataset: Option<HistoricalDataset>,
}

impl SimulationRunner {
    /// Runner backed by the embedded US historical dataset
    pub fn new(portfolio: PortfolioSnapshot) -> Self {
        Self {
            portfolio,
            dataset: Some(HistoricalDataset::default_us()),
        }
    }

    /// Runner with a caller-supplied dataset
    pub fn with_dataset(portfolio: PortfolioSnapshot, dataset: HistoricalDataset) -> Self {
        Self {
            portfolio,
            dataset: Some(dataset),
        }
    }

    /// Runner without historical data; only parametric mode will work
    pub fn without_history(portfolio: PortfolioSnapshot) -> Self {
        Self {
            portfolio,
            dataset: None,
        }
    }

    /// Runner loading its dataset from a CSV file
    pub fn from_csv_path(
        portfolio: PortfolioSnapshot,
        path: &Path,
    ) -> Result<Self, SimulationError> {
        let dataset = loader::load_history(path)?;
        Ok(Self {
            portfolio,
            dataset: Some(dataset),
        })
    }

    pub fn portfolio(&self) -> &PortfolioSnapshot {
        &self.portfolio
    }

    pub fn dataset(&self) -> Option<&HistoricalDataset> {
        self.dataset.as_ref()
    }

    /// Run a complete run-set with no progress reporting or cancellation.
    pub fn run(&self, params: &SimulationParameters) -> Result<SimulationResult, SimulationError> {
        self.run_with(params, None, None)
    }

    /// Run a complete run-set in batches, reporting progress after each batch
    /// and observing the cancellation flag at batch boundaries.
    ///
    /// Cancellation yields `Err(Cancelled)` and no partial aggregate; a batch
    /// finishing in flight when the flag flips is discarded, never merged.
    pub fn run_with(
        &self,
        params: &SimulationParameters,
        progress: Option<ProgressFn<'_>>,
        cancel: Option<&AtomicBool>,
    ) -> Result<SimulationResult, SimulationError> {
        let dataset = self.dataset.as_ref();
        let master_seed = check_inputs(params, &self.portfolio, dataset)?;

        let total = params.number_of_runs;
        let mut trajectories = Vec::with_capacity(total as usize);

        let cancelled = || cancel.map_or(false, |flag| flag.load(Ordering::Relaxed));

        let mut batch_start = 0u32;
        while batch_start < total {
            if cancelled() {
                log::info!("simulation cancelled after {}/{} runs", batch_start, total);
                return Err(SimulationError::Cancelled);
            }

            let batch_end = batch_start.saturating_add(DEFAULT_BATCH_SIZE).min(total);
            let batch = simulate_range(
                params,
                &self.portfolio,
                dataset,
                master_seed,
                batch_start,
                batch_end,
            )?;

            if cancelled() {
                log::info!("simulation cancelled after {}/{} runs", batch_start, total);
                return Err(SimulationError::Cancelled);
            }

            trajectories.extend(batch);
            batch_start = batch_end;

            log::debug!("completed {}/{} runs", batch_end, total);
            if let Some(report) = progress {
                report(batch_end, total);
            }
        }

        Ok(aggregate(trajectories, params))
    }
}
