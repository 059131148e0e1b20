//! DCF enterprise valuation, WACC, and the Gordon-growth dividend model
//!
//! The growth-versus-discount-rate boundaries here are anticipated inputs,
//! not programming faults, so they come back as an error field on the
//! result record with the value left unset.

use serde::{Deserialize, Serialize};

/// Discounted-cash-flow valuation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfValuation {
    /// Unset when the terminal-value precondition fails
    pub enterprise_value: Option<f64>,

    /// PV of the explicit projection period
    pub pv_of_cash_flows: f64,

    /// PV of the Gordon-growth terminal value
    pub pv_of_terminal_value: f64,

    /// Populated when the inputs are outside the model's domain
    pub error: Option<String>,
}

/// Value a company by discounting projected free cash flows
///
/// Projects `base_fcf` growing at `growth_rate_pct` for `years`, discounts
/// at the WACC, and adds a Gordon-growth terminal value. The perpetuity is
/// undefined unless `wacc > terminal_growth`, so that case reports an
/// error field instead of a blown-up number.
pub fn dcf_valuation(
    base_fcf: f64,
    growth_rate_pct: f64,
    years: u32,
    wacc_pct: f64,
    terminal_growth_pct: f64,
) -> DcfValuation {
    let wacc = wacc_pct / 100.0;
    let terminal_growth = terminal_growth_pct / 100.0;

    if wacc <= terminal_growth {
        return DcfValuation {
            enterprise_value: None,
            pv_of_cash_flows: 0.0,
            pv_of_terminal_value: 0.0,
            error: Some(format!(
                "WACC ({wacc_pct}%) must exceed terminal growth ({terminal_growth_pct}%) for the perpetuity to be defined"
            )),
        };
    }

    let growth = growth_rate_pct / 100.0;

    let mut pv_of_cash_flows = 0.0;
    let mut fcf = base_fcf;
    for t in 1..=years {
        fcf *= 1.0 + growth;
        pv_of_cash_flows += fcf / (1.0 + wacc).powi(t as i32);
    }

    // Gordon growth on the first post-projection year's flow
    let terminal_value = fcf * (1.0 + terminal_growth) / (wacc - terminal_growth);
    let pv_of_terminal_value = terminal_value / (1.0 + wacc).powi(years as i32);

    DcfValuation {
        enterprise_value: Some(pv_of_cash_flows + pv_of_terminal_value),
        pv_of_cash_flows,
        pv_of_terminal_value,
        error: None,
    }
}

/// WACC result record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaccResult {
    /// Unset when the capital structure is empty
    pub wacc_pct: Option<f64>,

    pub equity_weight: f64,
    pub debt_weight: f64,

    /// After-tax cost of debt actually used
    pub after_tax_cost_of_debt_pct: f64,

    pub error: Option<String>,
}

/// Weighted average cost of capital
///
/// `E/V·Re + D/V·Rd·(1 − tax)`. A zero total capital base leaves the
/// weights undefined and reports an error field.
pub fn weighted_average_cost_of_capital(
    equity_value: f64,
    debt_value: f64,
    cost_of_equity_pct: f64,
    cost_of_debt_pct: f64,
    tax_rate_pct: f64,
) -> WaccResult {
    let total = equity_value + debt_value;
    let after_tax_cost_of_debt_pct = cost_of_debt_pct * (1.0 - tax_rate_pct / 100.0);

    if total <= 0.0 {
        return WaccResult {
            wacc_pct: None,
            equity_weight: 0.0,
            debt_weight: 0.0,
            after_tax_cost_of_debt_pct,
            error: Some("total capital (equity + debt) must be positive".to_string()),
        };
    }

    let equity_weight = equity_value / total;
    let debt_weight = debt_value / total;
    let wacc_pct =
        equity_weight * cost_of_equity_pct + debt_weight * after_tax_cost_of_debt_pct;

    WaccResult {
        wacc_pct: Some(wacc_pct),
        equity_weight,
        debt_weight,
        after_tax_cost_of_debt_pct,
        error: None,
    }
}

/// Gordon-growth dividend discount model result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdmValuation {
    /// Unset when `required_return <= growth_rate`
    pub intrinsic_value: Option<f64>,

    /// Next year's dividend `D1 = D0 × (1 + g)`
    pub projected_dividend: f64,

    pub error: Option<String>,
}

/// Intrinsic share value under Gordon growth: `D1 / (r − g)`
///
/// Growth at or above the required return is an anticipated input
/// boundary: the model has no finite value there, so the result carries
/// an error string with `intrinsic_value` unset.
pub fn calculate_ddm(
    current_dividend: f64,
    growth_rate_pct: f64,
    required_return_pct: f64,
) -> DdmValuation {
    let growth = growth_rate_pct / 100.0;
    let required = required_return_pct / 100.0;
    let projected_dividend = current_dividend * (1.0 + growth);

    if required <= growth {
        return DdmValuation {
            intrinsic_value: None,
            projected_dividend,
            error: Some(format!(
                "required return ({required_return_pct}%) must exceed dividend growth ({growth_rate_pct}%)"
            )),
        };
    }

    DdmValuation {
        intrinsic_value: Some(projected_dividend / (required - growth)),
        projected_dividend,
        error: None,
    }
}
