//! Parameter data structures for a simulation run-set

use serde::{Deserialize, Serialize};

fn default_runs() -> u32 {
    10_000
}

fn default_horizon() -> u32 {
    30
}

fn default_inflation() -> f64 {
    0.025
}

fn default_true() -> bool {
    true
}

/// Withdrawal strategy tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStrategy {
    /// Initial balance × rate, optionally inflation-indexed each year
    FixedPercentage,
    /// Current balance × rate each year, optionally clamped into a dollar band
    DynamicPercentage,
    /// Evolving baseline adjusted when the current rate crosses a guardrail
    Guardrails,
    /// Constant dollar amount, optionally inflation-indexed each year
    FixedDollar,
}

impl WithdrawalStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStrategy::FixedPercentage => "fixed_percentage",
            WithdrawalStrategy::DynamicPercentage => "dynamic_percentage",
            WithdrawalStrategy::Guardrails => "guardrails",
            WithdrawalStrategy::FixedDollar => "fixed_dollar",
        }
    }
}

/// Withdrawal strategy configuration
///
/// Knobs are strategy-specific: `rate` drives the percentage strategies and
/// seeds the guardrails baseline, `fixed_amount` drives the fixed-dollar
/// strategy, and the floor/ceiling/guardrail fields are ignored by strategies
/// that do not use them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalConfig {
    /// Strategy selector
    pub strategy: WithdrawalStrategy,

    /// Annual withdrawal rate (e.g. 0.04 for the classic 4% rule)
    #[serde(default)]
    pub rate: f64,

    /// Dynamic strategy: floor rate applied to the *initial* balance
    #[serde(default)]
    pub floor_rate: Option<f64>,

    /// Dynamic strategy: ceiling rate applied to the *initial* balance
    #[serde(default)]
    pub ceiling_rate: Option<f64>,

    /// Guardrails: upper withdrawal-rate threshold (spending cut when exceeded)
    #[serde(default)]
    pub upper_guardrail: Option<f64>,

    /// Guardrails: lower withdrawal-rate threshold (spending raise when undershot)
    #[serde(default)]
    pub lower_guardrail: Option<f64>,

    /// Guardrails: fractional adjustment applied on a crossing (e.g. 0.10)
    #[serde(default)]
    pub adjustment_pct: Option<f64>,

    /// Fixed-dollar strategy: annual withdrawal amount
    #[serde(default)]
    pub fixed_amount: f64,

    /// Grow the withdrawal baseline with inflation each year
    /// (fixed-percentage and fixed-dollar strategies)
    #[serde(default = "default_true")]
    pub inflation_adjusted: bool,

    /// Legacy flat income offset, constant every year (kept for
    /// backward compatibility; superseded by `scheduled_incomes`)
    #[serde(default)]
    pub fixed_income_real: f64,

    /// Legacy flat income offset, eroded by inflation from year 1
    /// (kept for backward compatibility; superseded by `scheduled_incomes`)
    #[serde(default)]
    pub fixed_income_nominal: f64,
}

impl WithdrawalConfig {
    /// Fixed-percentage configuration (the default strategy)
    pub fn fixed_percentage(rate: f64) -> Self {
        Self {
            strategy: WithdrawalStrategy::FixedPercentage,
            rate,
            floor_rate: None,
            ceiling_rate: None,
            upper_guardrail: None,
            lower_guardrail: None,
            adjustment_pct: None,
            fixed_amount: 0.0,
            inflation_adjusted: true,
            fixed_income_real: 0.0,
            fixed_income_nominal: 0.0,
        }
    }

    /// Dynamic-percentage configuration with an optional dollar band
    pub fn dynamic_percentage(rate: f64, floor_rate: Option<f64>, ceiling_rate: Option<f64>) -> Self {
        Self {
            strategy: WithdrawalStrategy::DynamicPercentage,
            rate,
            floor_rate,
            ceiling_rate,
            ..Self::fixed_percentage(rate)
        }
    }

    /// Guardrails configuration
    pub fn guardrails(rate: f64, lower: f64, upper: f64, adjustment: f64) -> Self {
        Self {
            strategy: WithdrawalStrategy::Guardrails,
            rate,
            upper_guardrail: Some(upper),
            lower_guardrail: Some(lower),
            adjustment_pct: Some(adjustment),
            ..Self::fixed_percentage(rate)
        }
    }

    /// Fixed-dollar configuration
    pub fn fixed_dollar(amount: f64, inflation_adjusted: bool) -> Self {
        Self {
            strategy: WithdrawalStrategy::FixedDollar,
            fixed_amount: amount,
            inflation_adjusted,
            ..Self::fixed_percentage(0.0)
        }
    }
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self::fixed_percentage(0.04)
    }
}

/// A time-windowed supplemental income source (pension, Social Security, ...)
///
/// Active exactly when `age ∈ [start_age, end_age]` (open-ended when
/// `end_age` is unset). COLA sources hold their amount constant; non-COLA
/// sources erode with inflation measured from *their own* start age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledIncome {
    /// Display name ("Social Security", "State pension", ...)
    pub name: String,

    /// Annual amount at the source's start age
    pub annual_amount: f64,

    /// First age (inclusive) at which the source pays
    pub start_age: u8,

    /// Last age (inclusive) at which the source pays; None = lifetime
    #[serde(default)]
    pub end_age: Option<u8>,

    /// Cost-of-living adjusted: amount holds its value against inflation
    #[serde(default)]
    pub inflation_adjusted: bool,
}

impl ScheduledIncome {
    pub fn new(name: impl Into<String>, annual_amount: f64, start_age: u8) -> Self {
        Self {
            name: name.into(),
            annual_amount,
            start_age,
            end_age: None,
            inflation_adjusted: false,
        }
    }

    /// Whether this source pays at the given age
    pub fn active_at(&self, age: u8) -> bool {
        age >= self.start_age && self.end_age.map_or(true, |end| age <= end)
    }
}

/// Per-asset-class return assumption for parametric sampling
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetAssumption {
    /// Expected annual return
    pub expected_return: f64,
    /// Annual return volatility (standard deviation)
    pub volatility: f64,
}

/// Full configuration for a simulation run-set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Number of independent trajectories to simulate (1..=100_000)
    #[serde(default = "default_runs")]
    pub number_of_runs: u32,

    /// Simulated retirement horizon in years (1..=50)
    #[serde(default = "default_horizon")]
    pub time_horizon_years: u32,

    /// Assumed annual inflation rate (-0.05..=0.15); drives income erosion and
    /// parametric-mode inflation
    #[serde(default = "default_inflation")]
    pub inflation_rate: f64,

    /// Resample historical years (bootstrap) rather than drawing from a
    /// parametric distribution
    #[serde(default = "default_true")]
    pub use_bootstrap: bool,

    /// Portfolio balance at year 0 (live value or an overridden target)
    pub starting_balance: f64,

    /// Override of the live portfolio weights, one weight per asset class,
    /// summing to 1.0 (±0.01)
    #[serde(default)]
    pub custom_allocation: Option<Vec<f64>>,

    /// Withdrawal strategy configuration
    #[serde(default)]
    pub withdrawal: WithdrawalConfig,

    /// Time-windowed supplemental income sources, evaluated against
    /// `retirement_age`
    #[serde(default)]
    pub scheduled_incomes: Vec<ScheduledIncome>,

    /// Age at the start of year 1; required for scheduled income to apply
    #[serde(default)]
    pub retirement_age: Option<u8>,

    /// Master RNG seed; identical seeds reproduce results bit-for-bit
    #[serde(default)]
    pub seed: Option<u64>,

    /// Bootstrap block length in years (≥ 2 preserves serial correlation;
    /// unset or 1 samples years independently)
    #[serde(default)]
    pub bootstrap_block_years: Option<usize>,

    /// Per-class expected return/volatility overrides for parametric mode,
    /// one entry per asset class
    #[serde(default)]
    pub custom_returns: Option<Vec<AssetAssumption>>,

    /// Retain every per-run trajectory in the result (visualization only;
    /// stripped before persistence)
    #[serde(default)]
    pub keep_all_runs: bool,
}

impl SimulationParameters {
    /// Parameters for a run-set with defaults for everything but the
    /// balance and withdrawal policy
    pub fn new(starting_balance: f64, withdrawal: WithdrawalConfig) -> Self {
        Self {
            number_of_runs: default_runs(),
            time_horizon_years: default_horizon(),
            inflation_rate: default_inflation(),
            use_bootstrap: true,
            starting_balance,
            custom_allocation: None,
            withdrawal,
            scheduled_incomes: Vec::new(),
            retirement_age: None,
            seed: None,
            bootstrap_block_years: None,
            custom_returns: None,
            keep_all_runs: false,
        }
    }
}
