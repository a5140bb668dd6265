//! Simulation parameters, withdrawal configuration, and scheduled income

mod data;
mod validate;

pub use data::{
    AssetAssumption, ScheduledIncome, SimulationParameters, WithdrawalConfig, WithdrawalStrategy,
};
