//! Greedy efficient-frontier search
//!
//! `GreedyFrontierSearch` is a documented heuristic, not a
//! quadratic-programming solve: for each target return it nudges weights
//! toward the target along each asset's return gap, clamps at zero,
//! renormalizes to sum one, and stops at a fixed iteration cap. Keeping
//! the heuristic (rather than an optimal solver) preserves output parity
//! with the planning tools built on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Number of target returns scanned between the lowest and highest
/// asset return
pub const FRONTIER_TARGET_STEPS: u32 = 20;

/// Weight-nudging iterations allowed per target return
pub const FRONTIER_MAX_ITERATIONS: u32 = 100;

/// Scale of each weight adjustment
pub const FRONTIER_STEP_SIZE: f64 = 0.02;

/// Return gap below which a target counts as hit
const TARGET_RETURN_TOLERANCE: f64 = 1e-6;

/// Tolerance on the sum-to-one weight invariant
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One candidate asset with optional pairwise correlations by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAsset {
    pub name: String,
    /// Expected annual return, percent
    pub expected_return: f64,
    /// Annualized standard deviation, percent
    pub std_dev: f64,
    /// Pairwise correlation to other assets by name; missing pairs
    /// default to 0
    #[serde(default)]
    pub correlations: HashMap<String, f64>,
}

/// One point on the searched frontier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Return the search aimed for, percent
    pub target_return: f64,
    /// Return of the weights actually found, percent
    pub achieved_return: f64,
    /// Portfolio standard deviation at those weights, percent
    pub std_dev: f64,
    /// Weights in asset order, non-negative, summing to one
    pub weights: Vec<f64>,
}

/// Expected return and standard deviation for a weighted portfolio
///
/// Weights must be non-negative and sum to one within tolerance.
pub fn portfolio_statistics(
    assets: &[PortfolioAsset],
    weights: &[f64],
) -> EngineResult<(f64, f64)> {
    if assets.len() != weights.len() {
        return Err(EngineError::invalid(
            "weights",
            "must have one weight per asset",
        ));
    }
    if weights.iter().any(|&w| w < 0.0) {
        return Err(EngineError::invalid("weights", "must be non-negative"));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(EngineError::invalid("weights", "must sum to 1"));
    }

    Ok((
        weighted_return(assets, weights),
        portfolio_std_dev(assets, weights),
    ))
}

fn weighted_return(assets: &[PortfolioAsset], weights: &[f64]) -> f64 {
    assets
        .iter()
        .zip(weights)
        .map(|(asset, w)| w * asset.expected_return)
        .sum()
}

fn correlation(a: &PortfolioAsset, b: &PortfolioAsset) -> f64 {
    if a.name == b.name {
        return 1.0;
    }
    a.correlations
        .get(&b.name)
        .or_else(|| b.correlations.get(&a.name))
        .copied()
        .unwrap_or(0.0)
}

fn portfolio_std_dev(assets: &[PortfolioAsset], weights: &[f64]) -> f64 {
    let mut variance = 0.0;
    for (i, a) in assets.iter().enumerate() {
        for (j, b) in assets.iter().enumerate() {
            variance += weights[i] * weights[j] * a.std_dev * b.std_dev * correlation(a, b);
        }
    }
    variance.max(0.0).sqrt()
}

/// Scan the frontier by greedy weight adjustment
///
/// Targets run from the lowest to the highest single-asset return in
/// `FRONTIER_TARGET_STEPS` increments. Each target starts from equal
/// weights and adjusts toward the target along each asset's gap to the
/// current portfolio return.
pub fn efficient_frontier(assets: &[PortfolioAsset]) -> EngineResult<Vec<FrontierPoint>> {
    if assets.len() < 2 {
        return Err(EngineError::InsufficientData(
            "frontier search requires at least 2 assets".into(),
        ));
    }

    let min_return = assets
        .iter()
        .map(|a| a.expected_return)
        .fold(f64::INFINITY, f64::min);
    let max_return = assets
        .iter()
        .map(|a| a.expected_return)
        .fold(f64::NEG_INFINITY, f64::max);
    let step = (max_return - min_return) / FRONTIER_TARGET_STEPS as f64;

    let mut points = Vec::with_capacity(FRONTIER_TARGET_STEPS as usize + 1);

    for i in 0..=FRONTIER_TARGET_STEPS {
        let target = min_return + step * i as f64;
        let weights = search_weights_for_target(assets, target);
        let achieved = weighted_return(assets, &weights);

        points.push(FrontierPoint {
            target_return: target,
            achieved_return: achieved,
            std_dev: portfolio_std_dev(assets, &weights),
            weights,
        });
    }

    Ok(points)
}

/// Nudge weights toward a target return, clamped and renormalized
fn search_weights_for_target(assets: &[PortfolioAsset], target: f64) -> Vec<f64> {
    let n = assets.len();
    let mut weights = vec![1.0 / n as f64; n];

    for _ in 0..FRONTIER_MAX_ITERATIONS {
        let current = weighted_return(assets, &weights);
        let gap = target - current;
        if gap.abs() < TARGET_RETURN_TOLERANCE {
            break;
        }

        // Push weight toward assets on the target's side of the current
        // return; the adjustment is proportional to each asset's gap
        for (w, asset) in weights.iter_mut().zip(assets) {
            *w += FRONTIER_STEP_SIZE * gap * (asset.expected_return - current);
            *w = w.max(0.0);
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            // Every weight clamped away; restart from equal and stop
            weights = vec![1.0 / n as f64; n];
            break;
        }
        for w in &mut weights {
            *w /= total;
        }
    }

    weights
}
