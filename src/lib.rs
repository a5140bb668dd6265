//! Retirement Simulator - Monte Carlo engine for FIRE withdrawal planning
//!
//! This library provides:
//! - Historical bootstrap and parametric return sampling (block bootstrap
//!   preserves serial correlation)
//! - Stateful withdrawal policies (fixed-percentage, dynamic-percentage,
//!   guardrails, fixed-dollar)
//! - Time-windowed supplemental income scheduling (pensions, delayed Social
//!   Security)
//! - Batched, parallel trajectory execution with reproducible seeding
//! - Statistical aggregation: success rates, percentiles, per-year
//!   projections, drawdown

pub mod error;
pub mod market;
pub mod params;
pub mod runner;
pub mod simulation;

// Re-export commonly used types
pub use error::{DatasetError, SimulationError, ValidationError};
pub use market::{AssetClass, HistoricalDataset, PortfolioSnapshot, ReturnSampler};
pub use params::{ScheduledIncome, SimulationParameters, WithdrawalConfig, WithdrawalStrategy};
pub use runner::{run_simulation, SimulationRunner};
pub use simulation::{SimulationResult, Trajectory, YearlyProjection};
