//! Portfolio snapshot and asset class definitions

use serde::{Deserialize, Serialize};

use crate::params::AssetAssumption;

/// Asset classes tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
}

impl AssetClass {
    /// All classes in canonical order; allocation weight vectors are indexed
    /// in this order.
    pub const ALL: [AssetClass; 3] = [AssetClass::Stocks, AssetClass::Bonds, AssetClass::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::Cash => "cash",
        }
    }

    /// Default parametric assumption for this class, used when the caller
    /// supplies no per-class overrides
    pub fn default_assumption(&self) -> AssetAssumption {
        match self {
            AssetClass::Stocks => AssetAssumption {
                expected_return: 0.10,
                volatility: 0.17,
            },
            AssetClass::Bonds => AssetAssumption {
                expected_return: 0.05,
                volatility: 0.07,
            },
            AssetClass::Cash => AssetAssumption {
                expected_return: 0.03,
                volatility: 0.01,
            },
        }
    }
}

/// Read-only snapshot of the live portfolio: total balance plus per-class
/// allocation weights
///
/// The engine never mutates the snapshot; custom allocation overrides in the
/// parameters take precedence over these weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Current total balance across all accounts
    pub total_balance: f64,

    /// Allocation weights indexed by [`AssetClass::ALL`] order, normalized to
    /// sum to 1.0
    weights: Vec<f64>,
}

impl PortfolioSnapshot {
    /// Create a snapshot from raw per-class market values; weights are
    /// normalized internally.
    pub fn new(stocks_value: f64, bonds_value: f64, cash_value: f64) -> Self {
        let total = stocks_value + bonds_value + cash_value;
        let weights = if total > 0.0 {
            vec![stocks_value / total, bonds_value / total, cash_value / total]
        } else {
            vec![1.0, 0.0, 0.0]
        };
        Self {
            total_balance: total,
            weights,
        }
    }

    /// Create a snapshot with explicit weights (must already sum to ~1.0)
    pub fn with_weights(total_balance: f64, weights: Vec<f64>) -> Self {
        Self {
            total_balance,
            weights,
        }
    }

    /// 60/30/10 stocks/bonds/cash snapshot, handy for tests and the CLI
    pub fn classic_three_fund(total_balance: f64) -> Self {
        Self::with_weights(total_balance, vec![0.60, 0.30, 0.10])
    }

    /// Allocation weights in [`AssetClass::ALL`] order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn asset_class_count(&self) -> usize {
        self.weights.len()
    }

    /// Weighted expected return under the given per-class assumptions
    pub fn expected_return(&self, assumptions: &[AssetAssumption]) -> f64 {
        self.weights
            .iter()
            .zip(assumptions)
            .map(|(w, a)| w * a.expected_return)
            .sum()
    }
}
