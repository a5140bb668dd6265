//! Per-year return sampling: historical bootstrap (iid or block) and
//! parametric draws
//!
//! The sampler is the only stochastic component in a trajectory. Bootstrap
//! mode resamples the historical dataset, optionally in contiguous blocks so
//! year-to-year correlation survives the resampling; parametric mode draws
//! each class from a Normal parameterized by its expected return and
//! volatility.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{DatasetError, SimulationError};
use crate::params::{AssetAssumption, SimulationParameters};

use super::{AssetClass, HistoricalDataset, PortfolioSnapshot};

/// One sampled simulated year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledYear {
    /// Blended portfolio return for the year
    pub portfolio_return: f64,
    /// Inflation rate for the year
    pub inflation: f64,
}

/// Cursor into a contiguous historical block being consumed year by year
#[derive(Debug, Clone, Copy)]
pub struct BlockCursor {
    /// Index of the block's first historical year
    start: usize,
    /// Years of the block already consumed
    offset: usize,
    /// Block length
    len: usize,
}

impl BlockCursor {
    fn exhausted(&self) -> bool {
        self.offset >= self.len
    }

    fn advance(&mut self) -> usize {
        let index = self.start + self.offset;
        self.offset += 1;
        index
    }
}

/// Historical bootstrap sampler
///
/// With a block length `L >= 2`, a random contiguous run of `L` historical
/// years is consumed sequentially before a new block is drawn; block starts
/// are uniform over `0..=len-L` so a block never wraps. Without a block
/// length every year is an independent draw.
pub struct BootstrapSampler<'a> {
    dataset: &'a HistoricalDataset,
    weights: Vec<f64>,
    block_len: Option<usize>,
    cursor: Option<BlockCursor>,
}

impl<'a> BootstrapSampler<'a> {
    pub fn new(
        dataset: &'a HistoricalDataset,
        weights: Vec<f64>,
        block_years: Option<usize>,
    ) -> Result<Self, DatasetError> {
        if dataset.is_empty() {
            return Err(DatasetError::Empty);
        }
        // A block longer than the dataset degrades to the whole dataset;
        // 0 or 1 behaves as iid sampling.
        let block_len = block_years
            .map(|len| len.min(dataset.len()))
            .filter(|&len| len >= 2);
        Ok(Self {
            dataset,
            weights,
            block_len,
            cursor: None,
        })
    }

    pub fn next_year<R: Rng>(&mut self, rng: &mut R) -> SampledYear {
        let index = match self.block_len {
            Some(len) => {
                let mut cursor = match self.cursor {
                    Some(c) if !c.exhausted() => c,
                    _ => BlockCursor {
                        start: rng.gen_range(0..=self.dataset.len() - len),
                        offset: 0,
                        len,
                    },
                };
                let index = cursor.advance();
                self.cursor = Some(cursor);
                index
            }
            None => rng.gen_range(0..self.dataset.len()),
        };

        let year = self.dataset.year_at(index);
        SampledYear {
            portfolio_return: year.blended_return(&self.weights),
            inflation: year.inflation,
        }
    }
}

/// Parametric sampler: independent Normal draws per asset class
///
/// No cross-asset correlation is modeled. Inflation is the configured scalar.
pub struct ParametricSampler {
    assumptions: Vec<AssetAssumption>,
    weights: Vec<f64>,
    inflation_rate: f64,
}

impl ParametricSampler {
    pub fn new(assumptions: &[AssetAssumption], weights: Vec<f64>, inflation_rate: f64) -> Self {
        Self {
            assumptions: assumptions.to_vec(),
            weights,
            inflation_rate,
        }
    }

    pub fn next_year<R: Rng>(&mut self, rng: &mut R) -> SampledYear {
        let portfolio_return = self
            .assumptions
            .iter()
            .zip(&self.weights)
            .map(|(a, w)| {
                let z: f64 = rng.sample(StandardNormal);
                w * (a.expected_return + a.volatility.max(0.0) * z)
            })
            .sum();
        SampledYear {
            portfolio_return,
            inflation: self.inflation_rate,
        }
    }
}

/// Return sampler for one trajectory: bootstrap or parametric mode
pub enum ReturnSampler<'a> {
    Bootstrap(BootstrapSampler<'a>),
    Parametric(ParametricSampler),
}

impl<'a> ReturnSampler<'a> {
    /// Build the sampler a parameter set asks for.
    ///
    /// Bootstrap mode requires a usable dataset; its absence is fatal to the
    /// run-set (the caller may retry in parametric mode).
    pub fn for_parameters(
        params: &SimulationParameters,
        portfolio: &PortfolioSnapshot,
        dataset: Option<&'a HistoricalDataset>,
    ) -> Result<Self, SimulationError> {
        let weights = effective_weights(params, portfolio);

        if params.use_bootstrap {
            let dataset = dataset.ok_or(DatasetError::Empty)?;
            let sampler = BootstrapSampler::new(dataset, weights, params.bootstrap_block_years)?;
            Ok(ReturnSampler::Bootstrap(sampler))
        } else {
            let assumptions = effective_assumptions(params);
            Ok(ReturnSampler::Parametric(ParametricSampler::new(
                &assumptions,
                weights,
                params.inflation_rate,
            )))
        }
    }

    /// Draw the next simulated year's (portfolio return, inflation) pair
    pub fn next_year<R: Rng>(&mut self, rng: &mut R) -> SampledYear {
        match self {
            ReturnSampler::Bootstrap(s) => s.next_year(rng),
            ReturnSampler::Parametric(s) => s.next_year(rng),
        }
    }
}

/// Caller-supplied override weights win over the live portfolio weights.
pub(crate) fn effective_weights(
    params: &SimulationParameters,
    portfolio: &PortfolioSnapshot,
) -> Vec<f64> {
    params
        .custom_allocation
        .clone()
        .unwrap_or_else(|| portfolio.weights().to_vec())
}

/// Caller-supplied per-class assumptions win over the class defaults.
pub(crate) fn effective_assumptions(params: &SimulationParameters) -> Vec<AssetAssumption> {
    params.custom_returns.clone().unwrap_or_else(|| {
        AssetClass::ALL
            .iter()
            .map(|class| class.default_assumption())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WithdrawalConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn tiny_dataset() -> HistoricalDataset {
        use crate::market::HistoricalYear;
        HistoricalDataset::new(
            (0..10)
                .map(|i| HistoricalYear {
                    year: 2000 + i as u16,
                    stocks: 0.01 * i as f64,
                    bonds: 0.001 * i as f64,
                    cash: 0.0,
                    inflation: 0.02,
                })
                .collect(),
        )
    }

    #[test]
    fn test_block_sampling_is_contiguous() {
        let dataset = tiny_dataset();
        let mut sampler = BootstrapSampler::new(&dataset, vec![1.0, 0.0, 0.0], Some(4)).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        // Returns encode the year index (stocks = 0.01 * i), so consecutive
        // draws within a block must step by exactly 0.01.
        let draws: Vec<f64> = (0..8).map(|_| sampler.next_year(&mut rng).portfolio_return).collect();
        for block in draws.chunks(4) {
            for pair in block.windows(2) {
                let step = pair[1] - pair[0];
                assert!((step - 0.01).abs() < 1e-12, "non-contiguous step {}", step);
            }
        }
    }

    #[test]
    fn test_block_longer_than_dataset_clamped() {
        let dataset = tiny_dataset();
        let mut sampler = BootstrapSampler::new(&dataset, vec![1.0, 0.0, 0.0], Some(500)).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        // Clamped to the dataset length; first block must start at 0.
        let first = sampler.next_year(&mut rng);
        assert!((first.portfolio_return - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_block_of_one_is_iid() {
        let dataset = tiny_dataset();
        let sampler = BootstrapSampler::new(&dataset, vec![1.0, 0.0, 0.0], Some(1)).unwrap();
        assert!(sampler.block_len.is_none());
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let dataset = HistoricalDataset::new(Vec::new());
        let result = BootstrapSampler::new(&dataset, vec![1.0, 0.0, 0.0], None);
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_parametric_zero_volatility_is_deterministic() {
        let assumptions = vec![
            AssetAssumption { expected_return: 0.07, volatility: 0.0 },
            AssetAssumption { expected_return: 0.04, volatility: 0.0 },
            AssetAssumption { expected_return: 0.02, volatility: 0.0 },
        ];
        let mut sampler = ParametricSampler::new(&assumptions, vec![0.5, 0.3, 0.2], 0.025);
        let mut rng = SmallRng::seed_from_u64(42);
        let year = sampler.next_year(&mut rng);
        let expected = 0.5 * 0.07 + 0.3 * 0.04 + 0.2 * 0.02;
        assert!((year.portfolio_return - expected).abs() < 1e-12);
        assert_eq!(year.inflation, 0.025);
    }

    #[test]
    fn test_bootstrap_requires_dataset() {
        let params = SimulationParameters::new(1_000_000.0, WithdrawalConfig::default());
        let portfolio = PortfolioSnapshot::classic_three_fund(1_000_000.0);
        let result = ReturnSampler::for_parameters(&params, &portfolio, None);
        assert!(matches!(result, Err(SimulationError::Dataset(_))));
    }

    #[test]
    fn test_override_weights_used() {
        let mut params = SimulationParameters::new(1_000_000.0, WithdrawalConfig::default());
        params.custom_allocation = Some(vec![1.0, 0.0, 0.0]);
        let portfolio = PortfolioSnapshot::classic_three_fund(1_000_000.0);
        assert_eq!(effective_weights(&params, &portfolio), vec![1.0, 0.0, 0.0]);
    }
}
