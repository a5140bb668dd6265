//! Market inputs: asset classes, the portfolio snapshot, the historical
//! return dataset, and the per-year return sampler

mod dataset;
pub mod loader;
mod portfolio;
mod sampler;

pub use dataset::{HistoricalDataset, HistoricalYear};
pub use portfolio::{AssetClass, PortfolioSnapshot};
pub use sampler::{BlockCursor, BootstrapSampler, ParametricSampler, ReturnSampler, SampledYear};
