//! Cash-flow and enterprise valuation calculators

mod cashflow;
mod dcf;
mod lease;

pub use cashflow::{internal_rate_of_return, net_present_value, payback_period, IrrOutcome};
pub use dcf::{calculate_ddm, dcf_valuation, weighted_average_cost_of_capital, DcfValuation, DdmValuation, WaccResult};
pub use lease::{lease_vs_buy, LeaseVsBuyComparison};
