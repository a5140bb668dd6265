//! Simulation core: income scheduling, withdrawal policy, the single-path
//! trajectory loop, and result aggregation

mod aggregate;
mod income;
mod trajectory;
mod withdrawal;

pub use aggregate::{aggregate, SimulationResult, YearlyProjection};
pub use income::{income_for_year, total_scheduled_income};
pub use trajectory::{simulate_trajectory, Trajectory};
pub use withdrawal::WithdrawalPolicy;
