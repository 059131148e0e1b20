//! Closed-form portfolio risk metrics
//!
//! All inputs are annualized percentages; VaR and CVaR scale a parametric
//! normal assumption by the portfolio value.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One-sided z-scores by confidence level, sorted ascending
const Z_SCORES: [(u32, f64); 3] = [(90, 1.282), (95, 1.645), (99, 2.326)];

/// Confidence level assumed when the requested one is not in the table
const DEFAULT_CONFIDENCE: u32 = 95;

/// Z-score for a confidence level in {90, 95, 99}
///
/// Unrecognized levels fall back to 95% rather than failing; the lookup
/// scans the explicit table so supported levels are visible in one place.
pub fn z_score_for_confidence(confidence_pct: u32) -> f64 {
    for &(level, z) in &Z_SCORES {
        if level == confidence_pct {
            return z;
        }
    }
    z_score_for_confidence(DEFAULT_CONFIDENCE)
}

/// Risk metric bundle for an annualized portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub sharpe_ratio: f64,
    pub treynor_ratio: f64,
    pub jensens_alpha_pct: f64,

    /// Parametric VaR in currency at the requested confidence
    pub value_at_risk: f64,

    /// Expected shortfall beyond the VaR threshold, in currency
    pub conditional_value_at_risk: f64,

    /// Confidence level actually used (after the default fallback)
    pub confidence_pct: u32,
}

/// Compute Sharpe, Treynor, Jensen's alpha, VaR, and CVaR
///
/// Zero volatility and zero beta are degenerate but defined: the
/// corresponding ratio is reported as 0 instead of dividing by zero.
pub fn portfolio_risk_metrics(
    portfolio_value: f64,
    annual_return_pct: f64,
    std_dev_pct: f64,
    beta: f64,
    risk_free_rate_pct: f64,
    market_return_pct: f64,
    confidence_pct: u32,
) -> EngineResult<RiskMetrics> {
    if portfolio_value <= 0.0 {
        return Err(EngineError::invalid("portfolio_value", "must be positive"));
    }
    if std_dev_pct < 0.0 {
        return Err(EngineError::invalid("std_dev_pct", "cannot be negative"));
    }

    let excess_return = annual_return_pct - risk_free_rate_pct;

    let sharpe_ratio = if std_dev_pct == 0.0 {
        0.0
    } else {
        excess_return / std_dev_pct
    };

    let treynor_ratio = if beta == 0.0 { 0.0 } else { excess_return / beta };

    let jensens_alpha_pct = annual_return_pct
        - (risk_free_rate_pct + beta * (market_return_pct - risk_free_rate_pct));

    let confidence = if Z_SCORES.iter().any(|&(level, _)| level == confidence_pct) {
        confidence_pct
    } else {
        DEFAULT_CONFIDENCE
    };
    let z = z_score_for_confidence(confidence);

    let mean = annual_return_pct / 100.0;
    let sigma = std_dev_pct / 100.0;
    let tail = 1.0 - confidence as f64 / 100.0;

    // Parametric normal VaR; a portfolio whose mean outruns the z·σ move
    // has no loss at this confidence, hence the floor at zero
    let value_at_risk = (portfolio_value * (z * sigma - mean)).max(0.0);

    // Expected shortfall under the same normal assumption:
    // ES = σ·φ(z)/(1−c) − μ, never better than the VaR itself
    let pdf_z = (-0.5 * z * z).exp() / (2.0 * PI).sqrt();
    let conditional_value_at_risk =
        (portfolio_value * (sigma * pdf_z / tail - mean)).max(value_at_risk);

    Ok(RiskMetrics {
        sharpe_ratio,
        treynor_ratio,
        jensens_alpha_pct,
        value_at_risk,
        conditional_value_at_risk,
        confidence_pct: confidence,
    })
}
