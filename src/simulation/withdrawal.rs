//! Withdrawal policy state machine
//!
//! One policy instance lives for the duration of a single trajectory and is
//! advanced exactly once per simulated year. Inflation indexation of the
//! baseline (fixed-percentage and fixed-dollar strategies) uses the sampled
//! inflation of the year being withdrawn, so bootstrap paths index spending by
//! the resampled year's CPI.

use crate::params::{WithdrawalConfig, WithdrawalStrategy};

/// Per-trajectory withdrawal state
#[derive(Debug, Clone)]
pub struct WithdrawalPolicy<'a> {
    config: &'a WithdrawalConfig,

    /// Evolving gross baseline: initial-balance × rate for the percentage
    /// strategies, the configured amount for fixed-dollar
    baseline: f64,

    /// Dollar band for the dynamic strategy, fixed off the *initial* balance
    floor_dollars: Option<f64>,
    ceiling_dollars: Option<f64>,

    /// Last simulated year already applied to the baseline
    year_applied: u32,
}

impl<'a> WithdrawalPolicy<'a> {
    pub fn new(config: &'a WithdrawalConfig, initial_balance: f64) -> Self {
        let baseline = match config.strategy {
            WithdrawalStrategy::FixedPercentage
            | WithdrawalStrategy::DynamicPercentage
            | WithdrawalStrategy::Guardrails => initial_balance * config.rate,
            WithdrawalStrategy::FixedDollar => config.fixed_amount,
        };

        // Dollar floor/ceiling are computed once from the initial balance and
        // clamp the dynamic withdrawal every year thereafter.
        let (floor_dollars, ceiling_dollars) =
            if config.strategy == WithdrawalStrategy::DynamicPercentage {
                (
                    config.floor_rate.map(|r| r * initial_balance),
                    config.ceiling_rate.map(|r| r * initial_balance),
                )
            } else {
                (None, None)
            };

        Self {
            config,
            baseline,
            floor_dollars,
            ceiling_dollars,
            year_applied: 0,
        }
    }

    /// Gross withdrawal for the year, advancing the policy state.
    ///
    /// `balance` is the post-growth balance for the year; `year_inflation` is
    /// the sampled inflation applied when the strategy is inflation-adjusted.
    pub fn gross_for_year(&mut self, year: u32, balance: f64, year_inflation: f64) -> f64 {
        debug_assert!(year > self.year_applied, "policy years must advance monotonically");
        self.year_applied = year;

        match self.config.strategy {
            WithdrawalStrategy::FixedPercentage | WithdrawalStrategy::FixedDollar => {
                if year > 1 && self.config.inflation_adjusted {
                    self.baseline *= 1.0 + year_inflation;
                }
                self.baseline
            }
            WithdrawalStrategy::DynamicPercentage => {
                let mut gross = balance * self.config.rate;
                if let Some(floor) = self.floor_dollars {
                    gross = gross.max(floor);
                }
                if let Some(ceiling) = self.ceiling_dollars {
                    gross = gross.min(ceiling);
                }
                gross
            }
            WithdrawalStrategy::Guardrails => {
                let gross = self.baseline;
                self.apply_guardrails(balance);
                gross
            }
        }
    }

    /// Net withdrawal: gross minus scheduled income, floored at zero.
    pub fn net_for_year(
        &mut self,
        year: u32,
        balance: f64,
        year_inflation: f64,
        scheduled_income: f64,
    ) -> f64 {
        (self.gross_for_year(year, balance, year_inflation) - scheduled_income).max(0.0)
    }

    /// Current baseline withdrawal (post any guardrail adjustment)
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Guardrail check against the current year's balance. A crossing adjusts
    /// the baseline for all *subsequent* years; the current year's withdrawal
    /// is never revised. Crossings are monotonic events, not reversed
    /// automatically.
    fn apply_guardrails(&mut self, balance: f64) {
        if balance <= 0.0 {
            return;
        }
        let adjustment = match self.config.adjustment_pct {
            Some(a) => a,
            None => return,
        };

        let current_rate = self.baseline / balance;
        if let Some(upper) = self.config.upper_guardrail {
            if current_rate > upper {
                self.baseline *= 1.0 - adjustment;
                return;
            }
        }
        if let Some(lower) = self.config.lower_guardrail {
            if current_rate < lower {
                self.baseline *= 1.0 + adjustment;
            }
        }
    }
}
