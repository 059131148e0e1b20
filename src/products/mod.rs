//! Retirement and insurance product calculators

mod annuity;
mod life;
mod pension;

pub use annuity::{
    fixed_annuity, variable_annuity, AnnuityProjection, AnnuityScheduleRow,
};
pub use life::{
    buy_sell_structure, term_life_premium, BuySellPlan, TermLifeQuote,
};
pub use pension::{
    defined_benefit_pension, defined_contribution_projection, DbPension, DcProjection,
    SurvivorElection, RMD_UNIFORM_DIVISOR, SAFE_WITHDRAWAL_RATE,
};
