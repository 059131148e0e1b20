//! Lease-versus-buy comparison on a present-value basis

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::timevalue::{amortization_payment, present_value_of_annuity};

/// PV comparison of financing a purchase against leasing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseVsBuyComparison {
    /// PV of loan payments net of the discounted residual value
    pub buy_net_cost: f64,

    /// PV of the lease payment stream
    pub lease_net_cost: f64,

    /// `"Buy"` or `"Lease"` — whichever costs less in PV terms
    pub recommendation: String,

    /// PV saved by following the recommendation
    pub savings: f64,

    /// Monthly loan payment under the buy scenario
    pub monthly_loan_payment: f64,
}

/// Compare financing a purchase against leasing over the same term
///
/// Both sides are discounted at the caller's opportunity rate. The buy
/// side finances the full price at the loan rate and gets the residual
/// value back at term end.
pub fn lease_vs_buy(
    purchase_price: f64,
    residual_value: f64,
    loan_rate_pct: f64,
    term_years: u32,
    monthly_lease_payment: f64,
    discount_rate_pct: f64,
) -> EngineResult<LeaseVsBuyComparison> {
    if purchase_price <= 0.0 {
        return Err(EngineError::invalid("purchase_price", "must be positive"));
    }
    if term_years == 0 {
        return Err(EngineError::invalid("term_years", "must be at least 1"));
    }

    let months = term_years * 12;
    let monthly_discount = discount_rate_pct / 100.0 / 12.0;

    let monthly_loan_payment =
        amortization_payment(purchase_price, loan_rate_pct / 100.0 / 12.0, months)?;

    let pv_loan_payments = present_value_of_annuity(monthly_loan_payment, monthly_discount, months);
    let pv_residual = residual_value / (1.0 + monthly_discount).powi(months as i32);
    let buy_net_cost = pv_loan_payments - pv_residual;

    let lease_net_cost = present_value_of_annuity(monthly_lease_payment, monthly_discount, months);

    let (recommendation, savings) = if buy_net_cost <= lease_net_cost {
        ("Buy", lease_net_cost - buy_net_cost)
    } else {
        ("Lease", buy_net_cost - lease_net_cost)
    };

    Ok(LeaseVsBuyComparison {
        buy_net_cost,
        lease_net_cost,
        recommendation: recommendation.to_string(),
        savings,
        monthly_loan_payment,
    })
}
