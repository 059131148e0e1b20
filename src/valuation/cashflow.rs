//! NPV, IRR, and payback period for a projected cash-flow series
//!
//! Period 0 is the initial outlay; the series holds the subsequent
//! periods' signed flows. IRR runs the Newton-Raphson solver against the
//! NPV function and its analytic derivative.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::solver::{newton_raphson, SolverOptions};

/// Initial guess for the IRR search
const IRR_INITIAL_GUESS: f64 = 0.10;

/// Net present value of a series at a given annual discount rate
///
/// `-initial_outlay + Σ cf_t / (1+r)^t` with `t` starting at 1.
pub fn net_present_value(initial_outlay: f64, cash_flows: &[f64], rate_pct: f64) -> f64 {
    let rate = rate_pct / 100.0;

    let discounted: f64 = cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32 + 1))
        .sum();

    discounted - initial_outlay
}

/// Derivative of NPV with respect to the rate (as a decimal)
fn npv_derivative(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| {
            let t = i as f64 + 1.0;
            -t * cf / (1.0 + rate).powi(i as i32 + 2)
        })
        .sum()
}

/// IRR search result
///
/// `converged == false` means the solver exhausted its budget; `rate` is
/// then the last iterate — an estimate, not an exact root — and callers
/// must treat it as such.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrOutcome {
    /// Annual rate as a decimal (0.05 = 5%)
    pub rate: f64,

    /// Whether the solver met its tolerance
    pub converged: bool,

    /// Newton-Raphson iterations performed
    pub iterations: u32,

    /// NPV of the series at the reported rate
    pub npv_at_rate: f64,
}

/// Internal rate of return via Newton-Raphson, seeded at 10%
pub fn internal_rate_of_return(
    initial_outlay: f64,
    cash_flows: &[f64],
) -> EngineResult<IrrOutcome> {
    if cash_flows.is_empty() {
        return Err(EngineError::InsufficientData(
            "IRR requires at least one cash flow after the initial outlay".into(),
        ));
    }

    // A series without a sign change has no guaranteed real root; the
    // search still runs and reports non-convergence rather than failing
    let has_inflow = initial_outlay < 0.0 || cash_flows.iter().any(|&cf| cf > 0.0);
    let has_outflow = initial_outlay > 0.0 || cash_flows.iter().any(|&cf| cf < 0.0);
    if !has_inflow || !has_outflow {
        warn!("IRR input has no sign change; search is unlikely to converge");
    }

    let f = |rate: f64| {
        let discounted: f64 = cash_flows
            .iter()
            .enumerate()
            .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32 + 1))
            .sum();
        discounted - initial_outlay
    };
    let df = |rate: f64| npv_derivative(cash_flows, rate);

    let estimate = newton_raphson(f, df, IRR_INITIAL_GUESS, SolverOptions::default());

    Ok(IrrOutcome {
        rate: estimate.root,
        converged: estimate.converged,
        iterations: estimate.iterations,
        npv_at_rate: estimate.residual,
    })
}

/// Years to recover the initial outlay, interpolated within the
/// crossing year rather than rounded to a whole period
pub fn payback_period(initial_outlay: f64, cash_flows: &[f64]) -> Option<f64> {
    let mut remaining = initial_outlay;

    for (i, &cf) in cash_flows.iter().enumerate() {
        if cf > 0.0 && remaining <= cf {
            return Some(i as f64 + remaining / cf);
        }
        remaining -= cf;
    }

    None
}
