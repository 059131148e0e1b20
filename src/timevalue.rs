//! Time-value-of-money primitives
//!
//! Present/future value and level-payment math used by nearly every other
//! calculator. All functions are pure f64 arithmetic with explicit
//! limiting-case branches where a naive formula would divide by zero.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An annual percentage rate with its compounding frequency
///
/// Rates below -100% have no meaningful accumulation factor and a zero
/// compounding frequency has no periods, so both are rejected at
/// construction. Negative rates (deflation scenarios) are allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateSpec {
    /// Annual rate in percent (5.0 = 5%)
    pub annual_rate_pct: f64,
    /// Compounding periods per year
    pub periods_per_year: u32,
}

impl RateSpec {
    pub fn new(annual_rate_pct: f64, periods_per_year: u32) -> EngineResult<Self> {
        if annual_rate_pct <= -100.0 {
            return Err(EngineError::invalid(
                "annual_rate_pct",
                "must be greater than -100%",
            ));
        }
        if periods_per_year == 0 {
            return Err(EngineError::invalid(
                "periods_per_year",
                "must be at least 1",
            ));
        }
        Ok(Self {
            annual_rate_pct,
            periods_per_year,
        })
    }

    /// Per-period rate as a decimal
    pub fn periodic(&self) -> f64 {
        self.annual_rate_pct / 100.0 / self.periods_per_year as f64
    }

    /// Effective annual rate as a decimal, after compounding
    pub fn effective_annual(&self) -> f64 {
        (1.0 + self.periodic()).powi(self.periods_per_year as i32) - 1.0
    }
}

/// Present value of a level ordinary annuity
///
/// `payment * (1 - (1+r)^-n) / r` for a nonzero periodic rate.
/// At exactly zero the annuity factor degenerates to `n`, so the result is
/// `payment * n` with no discounting.
pub fn present_value_of_annuity(payment: f64, periodic_rate: f64, num_periods: u32) -> f64 {
    if periodic_rate == 0.0 {
        return payment * num_periods as f64;
    }

    let factor = (1.0 - (1.0 + periodic_rate).powi(-(num_periods as i32))) / periodic_rate;
    payment * factor
}

/// Future value of a principal compounded for `num_periods`
pub fn future_value_growth(principal: f64, periodic_rate: f64, num_periods: u32) -> f64 {
    principal * (1.0 + periodic_rate).powi(num_periods as i32)
}

/// Level payment that amortizes `principal` over `num_periods`
///
/// `P * r(1+r)^n / ((1+r)^n - 1)`. A zero-period loan has no defined
/// payment and is rejected. At zero rate the payment is the straight
/// division `P / n`.
pub fn amortization_payment(
    principal: f64,
    periodic_rate: f64,
    num_periods: u32,
) -> EngineResult<f64> {
    if num_periods == 0 {
        return Err(EngineError::invalid(
            "num_periods",
            "amortization requires at least one period",
        ));
    }

    if periodic_rate == 0.0 {
        return Ok(principal / num_periods as f64);
    }

    let growth = (1.0 + periodic_rate).powi(num_periods as i32);
    Ok(principal * periodic_rate * growth / (growth - 1.0))
}
