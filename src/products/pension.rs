//! Defined-benefit and defined-contribution retirement projections

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Benefit accrued per year of service, as a fraction of final salary
const DB_ACCRUAL_RATE: f64 = 0.015;

/// Normal retirement age for the defined-benefit formula
const DB_NORMAL_RETIREMENT_AGE: u32 = 65;

/// Benefit reduction per year of retirement before the normal age
const DB_EARLY_RETIREMENT_PENALTY: f64 = 0.06;

/// Safe-withdrawal rate applied to the projected balance (the "4% rule")
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

/// Fixed divisor standing in for the age-indexed IRS Uniform Lifetime
/// table. A single constant is a deliberate simplification of the RMD
/// estimate; swapping in the full table would change reported values.
pub const RMD_UNIFORM_DIVISOR: f64 = 26.5;

/// Survivor continuation election on a defined-benefit pension
///
/// Each election applies a fixed factor to the (possibly early-reduced)
/// single-life benefit. The factors are historical-market approximations,
/// reproduced as given rather than derived from the mortality curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurvivorElection {
    /// 100% continues to the survivor
    Full,
    /// 75% continues to the survivor
    ThreeQuarters,
    /// 50% continues to the survivor
    Half,
}

impl SurvivorElection {
    /// Factor applied to the reduced single-life benefit
    pub fn benefit_factor(self) -> f64 {
        match self {
            SurvivorElection::Full => 1.00,
            SurvivorElection::ThreeQuarters => 0.95,
            SurvivorElection::Half => 0.92,
        }
    }

    /// Fraction of the elected benefit continuing to the survivor
    pub fn continuation_pct(self) -> f64 {
        match self {
            SurvivorElection::Full => 1.00,
            SurvivorElection::ThreeQuarters => 0.75,
            SurvivorElection::Half => 0.50,
        }
    }
}

/// Defined-benefit pension estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbPension {
    /// Single-life annual benefit after any early-retirement reduction
    pub annual_benefit: f64,
    pub monthly_benefit: f64,

    /// Total early-retirement reduction applied (0 at or after 65)
    pub early_reduction_pct: f64,

    /// Annual benefit under the chosen survivor election
    pub elected_annual_benefit: f64,

    /// Annual amount continuing to the survivor after the member's death
    pub survivor_annual_benefit: f64,
}

/// Estimate a defined-benefit pension
///
/// Benefit = final salary × years of service × 1.5% accrual, reduced 6%
/// for each year of retirement before 65, then adjusted for the survivor
/// election.
pub fn defined_benefit_pension(
    final_salary: f64,
    years_of_service: f64,
    retirement_age: u32,
    election: SurvivorElection,
) -> EngineResult<DbPension> {
    if final_salary <= 0.0 {
        return Err(EngineError::invalid("final_salary", "must be positive"));
    }
    if years_of_service <= 0.0 {
        return Err(EngineError::invalid(
            "years_of_service",
            "must be positive",
        ));
    }

    let base_benefit = final_salary * years_of_service * DB_ACCRUAL_RATE;

    let years_early = DB_NORMAL_RETIREMENT_AGE.saturating_sub(retirement_age) as f64;
    let early_reduction_pct = (years_early * DB_EARLY_RETIREMENT_PENALTY).min(1.0);
    let annual_benefit = base_benefit * (1.0 - early_reduction_pct);

    let elected_annual_benefit = annual_benefit * election.benefit_factor();
    let survivor_annual_benefit = elected_annual_benefit * election.continuation_pct();

    Ok(DbPension {
        annual_benefit,
        monthly_benefit: annual_benefit / 12.0,
        early_reduction_pct,
        elected_annual_benefit,
        survivor_annual_benefit,
    })
}

/// Defined-contribution projection output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcProjection {
    pub projected_balance: f64,

    /// Employee plus employer contributions over the horizon
    pub total_contributions: f64,

    /// Growth in excess of contributions and the starting balance
    pub investment_growth: f64,

    /// First-year income under the safe-withdrawal rate
    pub safe_withdrawal_income: f64,

    /// Required-minimum-distribution estimate at the fixed divisor
    pub estimated_rmd: f64,
}

/// Project a defined-contribution (401k-style) account to retirement
///
/// Compounds annually: the balance grows a full year, then the year's
/// employee contribution and employer match land at year end.
pub fn defined_contribution_projection(
    current_balance: f64,
    annual_contribution: f64,
    employer_match_pct: f64,
    annual_return_pct: f64,
    current_age: u32,
    retirement_age: u32,
) -> EngineResult<DcProjection> {
    if retirement_age <= current_age {
        return Err(EngineError::invalid(
            "retirement_age",
            "must be after current age",
        ));
    }
    if current_balance < 0.0 || annual_contribution < 0.0 {
        return Err(EngineError::invalid(
            "current_balance",
            "balance and contribution cannot be negative",
        ));
    }

    let growth = 1.0 + annual_return_pct / 100.0;
    let yearly_inflow = annual_contribution * (1.0 + employer_match_pct / 100.0);
    let years = retirement_age - current_age;

    let mut balance = current_balance;
    for _ in 0..years {
        balance = balance * growth + yearly_inflow;
    }

    let total_contributions = yearly_inflow * years as f64;

    Ok(DcProjection {
        projected_balance: balance,
        total_contributions,
        investment_growth: balance - current_balance - total_contributions,
        safe_withdrawal_income: balance * SAFE_WITHDRAWAL_RATE,
        estimated_rmd: balance / RMD_UNIFORM_DIVISOR,
    })
}
