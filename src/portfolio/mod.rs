//! Portfolio analytics: risk metrics, Monte Carlo simulation, and the
//! greedy efficient-frontier search

mod frontier;
mod montecarlo;
mod risk;

pub use frontier::{
    efficient_frontier, portfolio_statistics, FrontierPoint, PortfolioAsset,
    FRONTIER_MAX_ITERATIONS, FRONTIER_STEP_SIZE, FRONTIER_TARGET_STEPS,
};
pub use montecarlo::{simulate_portfolio, SimulationResult};
pub use risk::{portfolio_risk_metrics, z_score_for_confidence, RiskMetrics};
