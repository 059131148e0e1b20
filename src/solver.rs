//! Generic Newton-Raphson root finder
//!
//! Used for IRR and implied-rate problems. The iterate is clamped so
//! `(1 + r)` never goes non-positive, which would make fractional powers
//! undefined further down the line.

use log::{debug, warn};

/// Default maximum iteration count
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default absolute convergence tolerance on `f(r)`
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Lower clamp for the iterate: keeps `1 + r` positive
const RATE_FLOOR: f64 = -0.99;

/// Derivative magnitude below which the iteration cannot proceed
const DERIVATIVE_EPSILON: f64 = 1e-12;

/// Solver configuration
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Outcome of a root search
///
/// An exhausted iteration budget is not an error: the last iterate is
/// returned with `converged` unset so the caller can decide what to do
/// with the estimate. Treating it as exact would be a correctness bug.
#[derive(Debug, Clone, Copy)]
pub struct RootEstimate {
    /// Final iterate (exact root only when `converged` is true)
    pub root: f64,

    /// Whether `|f(root)|` fell below the tolerance
    pub converged: bool,

    /// Iterations actually performed
    pub iterations: u32,

    /// `f(root)` at the final iterate
    pub residual: f64,
}

/// Find a root of `f` by Newton-Raphson given its derivative `df`
pub fn newton_raphson<F, D>(f: F, df: D, guess: f64, opts: SolverOptions) -> RootEstimate
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut rate = guess.max(RATE_FLOOR);
    let mut residual = f(rate);

    for iteration in 0..opts.max_iterations {
        if residual.abs() < opts.tolerance {
            debug!("newton_raphson converged after {} iterations, root={}", iteration, rate);
            return RootEstimate {
                root: rate,
                converged: true,
                iterations: iteration,
                residual,
            };
        }

        let derivative = df(rate);
        if derivative.abs() < DERIVATIVE_EPSILON {
            warn!("newton_raphson stalled on flat derivative at iteration {}", iteration);
            return RootEstimate {
                root: rate,
                converged: false,
                iterations: iteration,
                residual,
            };
        }

        rate = (rate - residual / derivative).max(RATE_FLOOR);
        residual = f(rate);
    }

    let converged = residual.abs() < opts.tolerance;
    if !converged {
        warn!(
            "newton_raphson exhausted {} iterations, residual={:.6e}",
            opts.max_iterations, residual
        );
    }

    RootEstimate {
        root: rate,
        converged,
        iterations: opts.max_iterations,
        residual,
    }
}
