//! Time-windowed supplemental income resolution
//!
//! Year 1 is the retirement year, so the simulated age in year `y` is
//! `retirement_age + y - 1`. COLA sources contribute their amount unchanged
//! every active year; non-COLA sources erode with inflation measured from the
//! source's *own* start age, not from the start of the simulation.

use crate::params::{ScheduledIncome, SimulationParameters};

/// Total active scheduled income for one simulated year.
pub fn total_scheduled_income(
    year: u32,
    retirement_age: u8,
    inflation_rate: f64,
    schedule: &[ScheduledIncome],
) -> f64 {
    let age = retirement_age as u32 + year - 1;
    schedule
        .iter()
        .filter(|income| age >= income.start_age as u32)
        .filter(|income| income.end_age.map_or(true, |end| age <= end as u32))
        .map(|income| {
            if income.inflation_adjusted {
                income.annual_amount
            } else {
                let years_since_start = age - income.start_age as u32;
                income.annual_amount / (1.0 + inflation_rate).powi(years_since_start as i32)
            }
        })
        .sum()
}

/// Supplemental income for one simulated year under the full parameter set.
///
/// The scheduled list and the legacy flat buckets are mutually exclusive: the
/// legacy `fixed_income_real` / `fixed_income_nominal` offsets apply only when
/// the computed scheduled income is exactly zero. They are never added to a
/// nonzero schedule (summing both was a historical double-counting bug).
pub fn income_for_year(params: &SimulationParameters, year: u32) -> f64 {
    if let Some(retirement_age) = params.retirement_age {
        if !params.scheduled_incomes.is_empty() {
            let scheduled = total_scheduled_income(
                year,
                retirement_age,
                params.inflation_rate,
                &params.scheduled_incomes,
            );
            if scheduled != 0.0 {
                return scheduled;
            }
        }
    }

    legacy_flat_income(params, year)
}

/// Legacy flat offsets: the real bucket holds its value, the nominal bucket
/// erodes from year 1 exactly like a non-COLA source starting at retirement.
fn legacy_flat_income(params: &SimulationParameters, year: u32) -> f64 {
    let w = &params.withdrawal;
    let real = w.fixed_income_real;
    let nominal = if w.fixed_income_nominal != 0.0 {
        w.fixed_income_nominal / (1.0 + params.inflation_rate).powi(year as i32 - 1)
    } else {
        0.0
    };
    real + nominal
}
