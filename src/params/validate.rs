//! Parameter validation
//!
//! Every violated constraint is collected so the caller sees the full list at
//! once; nothing executes when validation fails.

use crate::error::ValidationError;
use crate::market::PortfolioSnapshot;

use super::{SimulationParameters, WithdrawalStrategy};

const ALLOCATION_TOLERANCE: f64 = 0.01;

impl SimulationParameters {
    /// Check every documented constraint against this parameter set.
    ///
    /// Returns an empty vector when the parameters are valid.
    pub fn validate(&self, portfolio: &PortfolioSnapshot) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        if self.number_of_runs == 0 || self.number_of_runs > 100_000 {
            violations.push(ValidationError::RunsOutOfRange(self.number_of_runs));
        }

        if self.time_horizon_years == 0 || self.time_horizon_years > 50 {
            violations.push(ValidationError::HorizonOutOfRange(self.time_horizon_years));
        }

        if !(-0.05..=0.15).contains(&self.inflation_rate) {
            violations.push(ValidationError::InflationOutOfRange(self.inflation_rate));
        }

        if self.starting_balance <= 0.0 {
            violations.push(ValidationError::NonPositiveBalance(self.starting_balance));
        }

        if let Some(weights) = &self.custom_allocation {
            let expected = portfolio.asset_class_count();
            if weights.len() != expected {
                violations.push(ValidationError::AllocationLength {
                    expected,
                    got: weights.len(),
                });
            }
            if let Some(&w) = weights.iter().find(|w| **w < 0.0) {
                violations.push(ValidationError::NegativeWeight(w));
            }
            let sum: f64 = weights.iter().sum();
            if (sum - 1.0).abs() > ALLOCATION_TOLERANCE {
                violations.push(ValidationError::AllocationSum(sum));
            }
        }

        self.validate_withdrawal(&mut violations);
        self.validate_incomes(&mut violations);

        violations
    }

    fn validate_withdrawal(&self, violations: &mut Vec<ValidationError>) {
        let w = &self.withdrawal;
        match w.strategy {
            WithdrawalStrategy::FixedPercentage | WithdrawalStrategy::DynamicPercentage => {
                if w.rate <= 0.0 {
                    violations.push(ValidationError::NonPositiveRate(w.rate));
                }
                if let (Some(floor), Some(ceiling)) = (w.floor_rate, w.ceiling_rate) {
                    if floor > ceiling {
                        violations.push(ValidationError::FloorAboveCeiling { floor, ceiling });
                    }
                }
            }
            WithdrawalStrategy::Guardrails => {
                if w.rate <= 0.0 {
                    violations.push(ValidationError::NonPositiveRate(w.rate));
                }
                if let (Some(lower), Some(upper)) = (w.lower_guardrail, w.upper_guardrail) {
                    if lower >= upper {
                        violations.push(ValidationError::GuardrailOrder { lower, upper });
                    }
                }
                if let Some(adj) = w.adjustment_pct {
                    if adj <= 0.0 || adj >= 1.0 {
                        violations.push(ValidationError::AdjustmentOutOfRange(adj));
                    }
                }
            }
            WithdrawalStrategy::FixedDollar => {
                if w.fixed_amount <= 0.0 {
                    violations.push(ValidationError::NonPositiveFixedAmount(w.fixed_amount));
                }
            }
        }
    }

    fn validate_incomes(&self, violations: &mut Vec<ValidationError>) {
        for income in &self.scheduled_incomes {
            if income.annual_amount < 0.0 {
                violations.push(ValidationError::NegativeIncomeAmount {
                    name: income.name.clone(),
                    amount: income.annual_amount,
                });
            }
            if let Some(end) = income.end_age {
                if end < income.start_age {
                    violations.push(ValidationError::IncomeWindowInverted {
                        name: income.name.clone(),
                        start: income.start_age,
                        end,
                    });
                }
            }
        }
    }
}
