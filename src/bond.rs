//! Coupon bond pricing and interest-rate sensitivity measures

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Relative tolerance for the premium/discount classification, so an
/// at-par bond priced with accumulated floating error still reads as par
const PAR_CLASSIFICATION_TOLERANCE: f64 = 1e-9;

/// Full pricing and sensitivity output for a coupon bond
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondAnalysis {
    /// Dirty-free price: PV of coupons plus PV of redemption
    pub price: f64,

    /// Macaulay duration in years
    pub macaulay_duration: f64,

    /// Modified duration in years
    pub modified_duration: f64,

    /// Convexity in years squared
    pub convexity: f64,

    /// Annual coupon income over price
    pub current_yield: f64,

    /// Price above face value (beyond tolerance)
    pub premium: bool,

    /// Price below face value (beyond tolerance)
    pub discount: bool,
}

/// Price a level-coupon bond and derive its sensitivity measures
///
/// Each coupon and the redemption amount are discounted at the per-period
/// yield. A zero per-period yield takes the undiscounted branch: coupon PV
/// degenerates to `coupon × n` with no division by the rate.
///
/// The period count is `payments_per_year × years` truncated toward zero;
/// a fractional final period is dropped rather than rejected.
pub fn price_bond(
    face_value: f64,
    coupon_rate_pct: f64,
    years: f64,
    market_yield_pct: f64,
    payments_per_year: u32,
) -> EngineResult<BondAnalysis> {
    if face_value <= 0.0 {
        return Err(EngineError::invalid("face_value", "must be positive"));
    }
    if payments_per_year == 0 {
        return Err(EngineError::invalid(
            "payments_per_year",
            "must be at least 1",
        ));
    }

    let num_periods = (payments_per_year as f64 * years) as u32;
    if num_periods == 0 {
        return Err(EngineError::invalid(
            "years",
            "term must cover at least one coupon period",
        ));
    }

    let coupon = face_value * coupon_rate_pct / 100.0 / payments_per_year as f64;
    let yield_per_period = market_yield_pct / 100.0 / payments_per_year as f64;

    let mut price = 0.0;
    let mut time_weighted_pv = 0.0;
    let mut convexity_sum = 0.0;

    for t in 1..=num_periods {
        let mut cashflow = coupon;
        if t == num_periods {
            cashflow += face_value;
        }

        let pv = if yield_per_period == 0.0 {
            cashflow
        } else {
            cashflow / (1.0 + yield_per_period).powi(t as i32)
        };

        price += pv;
        time_weighted_pv += t as f64 * pv;
        convexity_sum += (t as f64) * (t as f64 + 1.0) * pv;
    }

    let ppy = payments_per_year as f64;
    let macaulay_duration = time_weighted_pv / price / ppy;
    let modified_duration = macaulay_duration / (1.0 + yield_per_period);
    let convexity = convexity_sum / (price * (1.0 + yield_per_period).powi(2)) / (ppy * ppy);
    let current_yield = face_value * coupon_rate_pct / 100.0 / price;

    let par_band = face_value * PAR_CLASSIFICATION_TOLERANCE;

    Ok(BondAnalysis {
        price,
        macaulay_duration,
        modified_duration,
        convexity,
        current_yield,
        premium: price > face_value + par_band,
        discount: price < face_value - par_band,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_at_par_bond() {
        // 5% coupon at 5% yield, semiannual, 10 years: must price at face
        let bond = price_bond(1000.0, 5.0, 10.0, 5.0, 2).unwrap();

        assert_relative_eq!(bond.price, 1000.0, max_relative = 1e-6);
        assert!(!bond.premium);
        assert!(!bond.discount);
        assert!((bond.current_yield - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_at_par_for_various_terms() {
        for &(years, ppy) in &[(1.0, 1), (5.0, 2), (7.0, 4), (30.0, 12)] {
            let bond = price_bond(1000.0, 6.0, years, 6.0, ppy).unwrap();
            assert_relative_eq!(bond.price, 1000.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_discount_and_premium() {
        // Yield above coupon → discount
        let discount = price_bond(1000.0, 4.0, 10.0, 6.0, 2).unwrap();
        assert!(discount.discount);
        assert!(!discount.premium);
        assert!(discount.price < 1000.0);

        // Yield below coupon → premium
        let premium = price_bond(1000.0, 6.0, 10.0, 4.0, 2).unwrap();
        assert!(premium.premium);
        assert!(!premium.discount);
        assert!(premium.price > 1000.0);
    }

    #[test]
    fn test_zero_yield_branch() {
        // At 0% yield the price is the plain cashflow sum
        let bond = price_bond(1000.0, 5.0, 10.0, 0.0, 2).unwrap();
        let expected = 25.0 * 20.0 + 1000.0;
        assert!((bond.price - expected).abs() < 1e-9);
    }

    #[test]
    fn test_duration_ordering() {
        let bond = price_bond(1000.0, 5.0, 10.0, 6.0, 2).unwrap();

        // Coupon bond duration is below maturity; modified below Macaulay
        assert!(bond.macaulay_duration < 10.0);
        assert!(bond.macaulay_duration > 5.0);
        assert!(bond.modified_duration < bond.macaulay_duration);
        assert!(bond.convexity > 0.0);
    }

    #[test]
    fn test_fractional_term_truncates() {
        // 1 payment/year over 1.75 years keeps only the single whole period
        let bond = price_bond(1000.0, 5.0, 1.75, 5.0, 1).unwrap();
        assert_relative_eq!(bond.price, 1050.0 / 1.05, max_relative = 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(price_bond(0.0, 5.0, 10.0, 5.0, 2).is_err());
        assert!(price_bond(1000.0, 5.0, 10.0, 5.0, 0).is_err());
        assert!(price_bond(1000.0, 5.0, 0.25, 5.0, 2).is_err());
    }
}
