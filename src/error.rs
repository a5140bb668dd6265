//! Error types for the simulation engine
//!
//! Validation problems are collected into a single [`SimulationError::InvalidParameters`]
//! so a caller sees every violated constraint at once, before any trajectory runs.

use thiserror::Error;

/// A single violated parameter constraint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("number_of_runs must be in 1..=100000, got {0}")]
    RunsOutOfRange(u32),

    #[error("time_horizon_years must be in 1..=50, got {0}")]
    HorizonOutOfRange(u32),

    #[error("inflation_rate must be in -0.05..=0.15, got {0}")]
    InflationOutOfRange(f64),

    #[error("starting balance must be positive, got {0}")]
    NonPositiveBalance(f64),

    #[error("custom allocation must have {expected} weights, got {got}")]
    AllocationLength { expected: usize, got: usize },

    #[error("custom allocation weights must sum to 1.0 (±0.01), got {0}")]
    AllocationSum(f64),

    #[error("allocation weights must be non-negative, got {0}")]
    NegativeWeight(f64),

    #[error("withdrawal rate must be positive, got {0}")]
    NonPositiveRate(f64),

    #[error("fixed withdrawal amount must be positive, got {0}")]
    NonPositiveFixedAmount(f64),

    #[error("lower guardrail {lower} must be below upper guardrail {upper}")]
    GuardrailOrder { lower: f64, upper: f64 },

    #[error("guardrail adjustment must be in (0, 1), got {0}")]
    AdjustmentOutOfRange(f64),

    #[error("withdrawal floor rate {floor} must not exceed ceiling rate {ceiling}")]
    FloorAboveCeiling { floor: f64, ceiling: f64 },

    #[error("scheduled income \"{name}\" ends at age {end} before it starts at age {start}")]
    IncomeWindowInverted { name: String, start: u8, end: u8 },

    #[error("scheduled income \"{name}\" must have a non-negative amount, got {amount}")]
    NegativeIncomeAmount { name: String, amount: f64 },
}

/// Errors loading or interpreting the historical dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read historical data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse historical data: {0}")]
    Csv(#[from] csv::Error),

    #[error("historical dataset contains no years")]
    Empty,
}

/// Top-level error for a simulation run-set
#[derive(Debug, Error)]
pub enum SimulationError {
    /// One or more parameter constraints were violated; nothing was executed.
    #[error("invalid simulation parameters: {}", format_violations(.0))]
    InvalidParameters(Vec<ValidationError>),

    /// Bootstrap sampling was requested but the historical dataset is unusable.
    #[error("historical dataset unavailable: {0}")]
    Dataset(#[from] DatasetError),

    /// The run-set was cancelled; no partial aggregate is produced.
    #[error("simulation cancelled")]
    Cancelled,
}

fn format_violations(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
