//! Fixed and variable annuity projections
//!
//! Both calculators accumulate the premium month by month through the
//! deferral phase, annuitize over the holder's remaining life expectancy,
//! then run the payout phase month by month. The reported schedule samples
//! payout year 1, every 5th year, and the final year — a display-size
//! bound on the output record, not a shortcut in the arithmetic.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::mortality::{life_expectancy, Health};
use crate::timevalue::amortization_payment;

/// Annual fee drag applied to variable annuity gross returns
const VARIABLE_ANNUITY_FEE_PCT: f64 = 1.25;

/// One payout-phase snapshot at the reporting cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuityScheduleRow {
    /// Payout year (1-indexed)
    pub period: u32,
    pub age: u32,
    /// Income paid during this year
    pub payment: f64,
    pub cumulative_paid: f64,
    pub remaining_balance: f64,
}

/// Projection output for an annuity contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuityProjection {
    /// Account value at annuitization
    pub accumulated_value: f64,

    /// Level monthly income through the payout phase
    pub monthly_payment: f64,

    /// Payout horizon from remaining life expectancy
    pub payout_years: f64,

    /// Total income if the full horizon is paid
    pub total_expected_payout: f64,

    /// Snapshots at payout year 1, 5-year marks, and the final year
    pub schedule: Vec<AnnuityScheduleRow>,
}

/// Project a fixed deferred annuity at a guaranteed crediting rate
pub fn fixed_annuity(
    premium: f64,
    guaranteed_rate_pct: f64,
    issue_age: u32,
    annuitization_age: u32,
    smoker: bool,
    health: Health,
) -> EngineResult<AnnuityProjection> {
    project_annuity(
        premium,
        guaranteed_rate_pct,
        issue_age,
        annuitization_age,
        smoker,
        health,
    )
}

/// Project a variable deferred annuity at an assumed gross return
///
/// The assumed return is reduced by the standard annual fee drag before
/// any compounding; payout mechanics match the fixed product.
pub fn variable_annuity(
    premium: f64,
    assumed_return_pct: f64,
    issue_age: u32,
    annuitization_age: u32,
    smoker: bool,
    health: Health,
) -> EngineResult<AnnuityProjection> {
    project_annuity(
        premium,
        assumed_return_pct - VARIABLE_ANNUITY_FEE_PCT,
        issue_age,
        annuitization_age,
        smoker,
        health,
    )
}

fn project_annuity(
    premium: f64,
    net_rate_pct: f64,
    issue_age: u32,
    annuitization_age: u32,
    smoker: bool,
    health: Health,
) -> EngineResult<AnnuityProjection> {
    if premium <= 0.0 {
        return Err(EngineError::invalid("premium", "must be positive"));
    }
    if annuitization_age < issue_age {
        return Err(EngineError::invalid(
            "annuitization_age",
            "cannot precede issue age",
        ));
    }

    let monthly_rate = net_rate_pct / 100.0 / 12.0;

    // Deferral phase: credit every month
    let deferral_months = (annuitization_age - issue_age) * 12;
    let mut account_value = premium;
    for _ in 0..deferral_months {
        account_value *= 1.0 + monthly_rate;
    }

    // Payout horizon from remaining life expectancy at annuitization
    let payout_years = life_expectancy(annuitization_age as f64, smoker, health);
    let payout_months = (payout_years * 12.0).round() as u32;
    let monthly_payment = amortization_payment(account_value, monthly_rate, payout_months)?;

    debug!(
        "annuity: AV {:.2} at age {}, paying {:.2}/mo for {:.1} years",
        account_value, annuitization_age, monthly_payment, payout_years
    );

    // Payout phase: run every month, snapshot at the reporting cadence
    let final_year = (payout_months + 11) / 12;
    let mut schedule = Vec::new();
    let mut balance = account_value;
    let mut cumulative_paid = 0.0;
    let mut paid_this_year = 0.0;

    for month in 1..=payout_months {
        balance = balance * (1.0 + monthly_rate) - monthly_payment;
        cumulative_paid += monthly_payment;
        paid_this_year += monthly_payment;

        let year_complete = month % 12 == 0 || month == payout_months;
        if year_complete {
            let year = (month + 11) / 12;
            if is_reporting_year(year, final_year) {
                schedule.push(AnnuityScheduleRow {
                    period: year,
                    age: annuitization_age + year,
                    payment: paid_this_year,
                    cumulative_paid,
                    remaining_balance: balance.max(0.0),
                });
            }
            paid_this_year = 0.0;
        }
    }

    Ok(AnnuityProjection {
        accumulated_value: account_value,
        monthly_payment,
        payout_years,
        total_expected_payout: monthly_payment * payout_months as f64,
        schedule,
    })
}

/// Reporting cadence: year 1, every 5th year, and the final year
fn is_reporting_year(year: u32, final_year: u32) -> bool {
    year == 1 || year % 5 == 0 || year == final_year
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_annuity_accumulation() {
        let projection =
            fixed_annuity(100_000.0, 4.0, 55, 65, false, Health::Average).unwrap();

        // 10 years of monthly compounding at 4% annual
        let expected = 100_000.0 * (1.0_f64 + 0.04 / 12.0).powi(120);
        assert!((projection.accumulated_value - expected).abs() < 0.01);
        assert!(projection.monthly_payment > 0.0);
    }

    #[test]
    fn test_schedule_sampling_cadence() {
        let projection =
            fixed_annuity(100_000.0, 4.0, 55, 65, false, Health::Average).unwrap();

        let years: Vec<u32> = projection.schedule.iter().map(|r| r.period).collect();

        // Year 1 and the 5-year marks are present; intermediate years are not
        assert!(years.contains(&1));
        assert!(years.contains(&5));
        assert!(years.contains(&10));
        assert!(!years.contains(&2));
        assert!(!years.contains(&7));

        // Final year is always reported
        let final_year = (projection.payout_years * 12.0).round() as u32 / 12;
        assert!(years.iter().any(|&y| y >= final_year));
    }

    #[test]
    fn test_balance_exhausts_at_horizon() {
        let projection =
            fixed_annuity(100_000.0, 4.0, 55, 65, false, Health::Average).unwrap();

        // Amortization over the full horizon leaves nothing behind
        let last = projection.schedule.last().unwrap();
        assert!(last.remaining_balance < 1.0);
        assert!(
            (last.cumulative_paid - projection.total_expected_payout).abs()
                < projection.monthly_payment
        );
    }

    #[test]
    fn test_variable_fee_drag() {
        let fixed =
            fixed_annuity(100_000.0, 6.0, 55, 65, false, Health::Average).unwrap();
        let variable =
            variable_annuity(100_000.0, 6.0, 55, 65, false, Health::Average).unwrap();

        // Same gross rate: the variable contract accumulates less after fees
        assert!(variable.accumulated_value < fixed.accumulated_value);
    }

    #[test]
    fn test_smoker_shortens_payout_horizon() {
        let nonsmoker =
            fixed_annuity(100_000.0, 4.0, 55, 65, false, Health::Average).unwrap();
        let smoker =
            fixed_annuity(100_000.0, 4.0, 55, 65, true, Health::Average).unwrap();

        assert!(smoker.payout_years < nonsmoker.payout_years);
        // Shorter horizon on the same account value pays more per month
        assert!(smoker.monthly_payment > nonsmoker.monthly_payment);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(fixed_annuity(0.0, 4.0, 55, 65, false, Health::Average).is_err());
        assert!(fixed_annuity(100_000.0, 4.0, 65, 55, false, Health::Average).is_err());
    }
}
