//! Monte Carlo projection of terminal portfolio values
//!
//! Each trial compounds one multiplicative annual return per year, with
//! the return drawn from a normal distribution via the Box-Muller
//! transform. Trials run in parallel; every trial derives its own RNG
//! stream from `seed + trial_index`, so the aggregated statistics are
//! identical regardless of execution order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Sorted terminal values plus order-statistic summary
///
/// Percentiles use floor-indexed order statistics (`sorted[(p × n) as
/// usize]`), not interpolation — at small sample counts the two differ in
/// the tails, so the choice is part of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Terminal value of every trial, ascending
    pub terminal_values: Vec<f64>,

    pub mean: f64,
    /// Middle element of the sorted trials
    pub median: f64,
    /// Floor-indexed 10th percentile
    pub percentile_10: f64,
    /// Floor-indexed 90th percentile
    pub percentile_90: f64,
    pub min: f64,
    pub max: f64,

    /// Fraction of trials ending below the initial investment
    pub probability_of_loss: f64,
}

/// Draw one standard normal variate via Box-Muller
///
/// `z = √(−2·ln u1) · cos(2π·u2)`; `u1` is shifted into (0, 1] so the log
/// never sees zero.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Terminal value of one trial: compound one sampled return per year
fn run_trial(
    initial_investment: f64,
    annual_return_pct: f64,
    std_dev_pct: f64,
    years: u32,
    rng: &mut StdRng,
) -> f64 {
    let mut value = initial_investment;
    for _ in 0..years {
        let annual_return = (annual_return_pct + std_dev_pct * standard_normal(rng)) / 100.0;
        // A return below -100% cannot lose more than the position
        value *= (1.0 + annual_return).max(0.0);
    }
    value
}

/// Simulate terminal portfolio values
///
/// `annual_return_pct` and `std_dev_pct` are annualized percentages. With
/// `std_dev_pct == 0` every path collapses to the deterministic
/// `initial · (1 + r)^years`.
pub fn simulate_portfolio(
    initial_investment: f64,
    annual_return_pct: f64,
    std_dev_pct: f64,
    years: u32,
    simulations: u32,
    seed: u64,
) -> EngineResult<SimulationResult> {
    if initial_investment <= 0.0 {
        return Err(EngineError::invalid(
            "initial_investment",
            "must be positive",
        ));
    }
    if years == 0 {
        return Err(EngineError::invalid("years", "must be at least 1"));
    }
    if simulations == 0 {
        return Err(EngineError::invalid("simulations", "must be at least 1"));
    }
    if std_dev_pct < 0.0 {
        return Err(EngineError::invalid("std_dev_pct", "cannot be negative"));
    }

    let mut terminal_values: Vec<f64> = (0..simulations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
            run_trial(
                initial_investment,
                annual_return_pct,
                std_dev_pct,
                years,
                &mut rng,
            )
        })
        .collect();

    terminal_values.sort_by(|a, b| a.total_cmp(b));

    let n = terminal_values.len();
    let mean = terminal_values.iter().sum::<f64>() / n as f64;
    let losses = terminal_values
        .iter()
        .filter(|&&v| v < initial_investment)
        .count();

    Ok(SimulationResult {
        mean,
        median: terminal_values[n / 2],
        percentile_10: terminal_values[(0.10 * n as f64) as usize],
        percentile_90: terminal_values[(0.90 * n as f64) as usize],
        min: terminal_values[0],
        max: terminal_values[n - 1],
        probability_of_loss: losses as f64 / n as f64,
        terminal_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_volatility_collapses_to_deterministic() {
        let result = simulate_portfolio(10_000.0, 7.0, 0.0, 10, 500, 42).unwrap();

        let expected = 10_000.0 * 1.07_f64.powi(10);
        for &value in &result.terminal_values {
            assert!((value - expected).abs() < 1e-6);
        }
        assert!((result.median - expected).abs() < 1e-6);
        assert!((result.percentile_10 - expected).abs() < 1e-6);
        assert_eq!(result.probability_of_loss, 0.0);
    }

    #[test]
    fn test_zero_volatility_negative_return_always_loses() {
        let result = simulate_portfolio(10_000.0, -5.0, 0.0, 5, 200, 42).unwrap();
        assert_eq!(result.probability_of_loss, 1.0);
    }

    #[test]
    fn test_results_sorted_and_consistent() {
        let result = simulate_portfolio(10_000.0, 7.0, 15.0, 20, 2_000, 7).unwrap();

        assert!(result
            .terminal_values
            .windows(2)
            .all(|pair| pair[0] <= pair[1]));
        assert_eq!(result.min, result.terminal_values[0]);
        assert_eq!(result.max, *result.terminal_values.last().unwrap());
        assert!(result.percentile_10 <= result.median);
        assert!(result.median <= result.percentile_90);
        assert!(result.probability_of_loss >= 0.0 && result.probability_of_loss <= 1.0);
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = simulate_portfolio(10_000.0, 7.0, 15.0, 10, 500, 99).unwrap();
        let b = simulate_portfolio(10_000.0, 7.0, 15.0, 10, 500, 99).unwrap();
        let c = simulate_portfolio(10_000.0, 7.0, 15.0, 10, 500, 100).unwrap();

        assert_eq!(a.terminal_values, b.terminal_values);
        assert_ne!(a.terminal_values, c.terminal_values);
    }

    #[test]
    fn test_mean_tracks_expected_growth() {
        // With enough trials the sample mean should land near the
        // arithmetic expectation (1 + μ)^years
        let result = simulate_portfolio(10_000.0, 7.0, 15.0, 10, 20_000, 11).unwrap();
        let expected = 10_000.0 * 1.07_f64.powi(10);

        let relative_gap = (result.mean - expected).abs() / expected;
        assert!(relative_gap < 0.05, "mean drifted {:.1}%", relative_gap * 100.0);
    }

    #[test]
    fn test_percentile_indexing_small_sample() {
        // Ten trials: p10 is element 1, p90 element 9, median element 5
        let result = simulate_portfolio(10_000.0, 7.0, 15.0, 5, 10, 3).unwrap();

        assert_eq!(result.percentile_10, result.terminal_values[1]);
        assert_eq!(result.percentile_90, result.terminal_values[9]);
        assert_eq!(result.median, result.terminal_values[5]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(simulate_portfolio(0.0, 7.0, 15.0, 10, 100, 1).is_err());
        assert!(simulate_portfolio(10_000.0, 7.0, 15.0, 0, 100, 1).is_err());
        assert!(simulate_portfolio(10_000.0, 7.0, 15.0, 10, 0, 1).is_err());
        assert!(simulate_portfolio(10_000.0, 7.0, -1.0, 10, 100, 1).is_err());
    }
}
