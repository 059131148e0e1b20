//! Term life premium rating and buy-sell coverage structuring

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::mortality::{death_probability, Health, SMOKER_MORTALITY_MULTIPLIER};

/// Age at which the exponential rating multiplier starts
const AGE_RATING_PIVOT: f64 = 35.0;

/// Annual growth of the rating multiplier past the pivot age
const AGE_RATING_GROWTH: f64 = 1.08;

/// Owner count above which an entity-purchase structure is recommended
const ENTITY_PURCHASE_OWNER_THRESHOLD: u32 = 3;

/// Annual rate per $1,000 of face by term length, one row per health tier
///
/// Sorted `(term_years, rate)` pairs, looked up by largest term at or below
/// the requested one. Historical-market approximations, not derived.
const EXCELLENT_RATES: [(u32, f64); 3] = [(10, 0.80), (20, 1.10), (30, 1.55)];
const AVERAGE_RATES: [(u32, f64); 3] = [(10, 1.20), (20, 1.65), (30, 2.30)];
const POOR_RATES: [(u32, f64); 3] = [(10, 2.10), (20, 2.90), (30, 4.00)];

/// Premium quote for a level term policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermLifeQuote {
    pub annual_premium: f64,
    pub monthly_premium: f64,
    /// Table rate before age and smoker loads
    pub rate_per_thousand: f64,
    /// `1.08^max(0, age - 35)` rating load
    pub age_multiplier: f64,
    /// Probability of a claim within the term, from the actuarial tables
    pub term_death_probability: f64,
}

/// Rate a level term life policy
///
/// Premium = table rate × (face / 1000) × age multiplier × smoker load.
pub fn term_life_premium(
    face_value: f64,
    age: u32,
    term_years: u32,
    smoker: bool,
    health: Health,
) -> EngineResult<TermLifeQuote> {
    if face_value <= 0.0 {
        return Err(EngineError::invalid("face_value", "must be positive"));
    }
    if term_years == 0 {
        return Err(EngineError::invalid("term_years", "must be at least 1"));
    }

    let rate_per_thousand = tier_rate(health, term_years);
    let age_multiplier = AGE_RATING_GROWTH.powf((age as f64 - AGE_RATING_PIVOT).max(0.0));
    let smoker_load = if smoker { SMOKER_MORTALITY_MULTIPLIER } else { 1.0 };

    let annual_premium = rate_per_thousand * (face_value / 1000.0) * age_multiplier * smoker_load;

    Ok(TermLifeQuote {
        annual_premium,
        monthly_premium: annual_premium / 12.0,
        rate_per_thousand,
        age_multiplier,
        term_death_probability: death_probability(age as f64, term_years, smoker),
    })
}

/// Largest table term at or below the requested term
fn tier_rate(health: Health, term_years: u32) -> f64 {
    let table = match health {
        Health::Excellent => &EXCELLENT_RATES,
        Health::Average => &AVERAGE_RATES,
        Health::Poor => &POOR_RATES,
    };

    let mut rate = table[0].1;
    for &(threshold, table_rate) in table {
        if term_years >= threshold {
            rate = table_rate;
        }
    }
    rate
}

/// Recommended buy-sell funding structure for a closely-held business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuySellPlan {
    /// `"Cross-Purchase Term Life"` or `"Entity-Purchase Term Life"`
    pub structure: String,

    /// Policies needed under the recommended structure
    pub policies_required: u32,

    /// Face amount per policy
    pub coverage_per_policy: f64,

    /// Each owner's share of the business value
    pub ownership_share: f64,
}

/// Recommend a buy-sell insurance structure
///
/// Cross-purchase needs `n(n-1)` policies (each owner insures every other
/// owner), so past a few owners the entity-purchase arrangement with one
/// policy per owner takes over.
pub fn buy_sell_structure(num_owners: u32, business_value: f64) -> EngineResult<BuySellPlan> {
    if num_owners < 2 {
        return Err(EngineError::invalid(
            "num_owners",
            "buy-sell planning requires at least 2 owners",
        ));
    }
    if business_value <= 0.0 {
        return Err(EngineError::invalid("business_value", "must be positive"));
    }

    let ownership_share = business_value / num_owners as f64;

    if num_owners > ENTITY_PURCHASE_OWNER_THRESHOLD {
        Ok(BuySellPlan {
            structure: "Entity-Purchase Term Life".to_string(),
            policies_required: num_owners,
            coverage_per_policy: ownership_share,
            ownership_share,
        })
    } else {
        let policies = num_owners * (num_owners - 1);
        Ok(BuySellPlan {
            structure: "Cross-Purchase Term Life".to_string(),
            policies_required: policies,
            coverage_per_policy: ownership_share / (num_owners - 1) as f64,
            ownership_share,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_lookup() {
        assert_eq!(tier_rate(Health::Excellent, 10), 0.80);
        assert_eq!(tier_rate(Health::Excellent, 20), 1.10);
        assert_eq!(tier_rate(Health::Poor, 30), 4.00);

        // Between table terms: largest threshold at or below
        assert_eq!(tier_rate(Health::Average, 15), 1.20);
        assert_eq!(tier_rate(Health::Average, 25), 1.65);

        // Below the smallest term falls back to the first row
        assert_eq!(tier_rate(Health::Average, 5), 1.20);
    }

    #[test]
    fn test_premium_at_pivot_age() {
        // At 35 the age multiplier is exactly 1
        let quote = term_life_premium(500_000.0, 35, 20, false, Health::Excellent).unwrap();
        assert!((quote.age_multiplier - 1.0).abs() < 1e-12);
        assert!((quote.annual_premium - 1.10 * 500.0).abs() < 1e-9);
        assert!((quote.monthly_premium * 12.0 - quote.annual_premium).abs() < 1e-9);
    }

    #[test]
    fn test_age_and_smoker_loads() {
        let base = term_life_premium(250_000.0, 45, 20, false, Health::Average).unwrap();
        let smoker = term_life_premium(250_000.0, 45, 20, true, Health::Average).unwrap();
        let younger = term_life_premium(250_000.0, 30, 20, false, Health::Average).unwrap();

        // 45-year-old carries 1.08^10
        assert!((base.age_multiplier - 1.08_f64.powi(10)).abs() < 1e-12);

        // Smoker load is exactly 2.5×
        assert!((smoker.annual_premium / base.annual_premium - 2.5).abs() < 1e-9);

        // Below the pivot no age load applies
        assert!((younger.age_multiplier - 1.0).abs() < 1e-12);
        assert!(younger.annual_premium < base.annual_premium);
    }

    #[test]
    fn test_tier_ordering() {
        let excellent = term_life_premium(250_000.0, 40, 20, false, Health::Excellent).unwrap();
        let average = term_life_premium(250_000.0, 40, 20, false, Health::Average).unwrap();
        let poor = term_life_premium(250_000.0, 40, 20, false, Health::Poor).unwrap();

        assert!(excellent.annual_premium < average.annual_premium);
        assert!(average.annual_premium < poor.annual_premium);
    }

    #[test]
    fn test_buy_sell_structures() {
        // Two owners: cross-purchase, 2 policies, each covering the other's share
        let two = buy_sell_structure(2, 1_000_000.0).unwrap();
        assert_eq!(two.structure, "Cross-Purchase Term Life");
        assert_eq!(two.policies_required, 2);
        assert!((two.coverage_per_policy - 500_000.0).abs() < 1e-9);

        // Three owners stays cross-purchase with n(n-1) = 6 policies
        let three = buy_sell_structure(3, 1_500_000.0).unwrap();
        assert_eq!(three.structure, "Cross-Purchase Term Life");
        assert_eq!(three.policies_required, 6);

        // Beyond the threshold: entity purchase, one policy per owner
        let six = buy_sell_structure(6, 3_000_000.0).unwrap();
        assert_eq!(six.structure, "Entity-Purchase Term Life");
        assert_eq!(six.policies_required, 6);
        assert!((six.coverage_per_policy - 500_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_buy_sell_invalid_inputs() {
        assert!(buy_sell_structure(1, 1_000_000.0).is_err());
        assert!(buy_sell_structure(4, 0.0).is_err());
    }
}
