//! Tax, audit-sampling, and depreciation calculators
//!
//! The bracket table is an illustrative constant set for planning
//! estimates, not a tax-law compliance engine.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::portfolio::z_score_for_confidence;

/// Progressive brackets as sorted `(lower_threshold, marginal_rate)` pairs
const TAX_BRACKETS: [(f64, f64); 7] = [
    (0.0, 0.10),
    (11_000.0, 0.12),
    (44_725.0, 0.22),
    (95_375.0, 0.24),
    (182_100.0, 0.32),
    (231_250.0, 0.35),
    (578_125.0, 0.37),
];

/// Income tax assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub total_tax: f64,
    /// Total tax over taxable income
    pub effective_rate: f64,
    /// Rate of the bracket the last dollar lands in
    pub marginal_rate: f64,
}

/// Progressive tax on taxable income from the bracket table
pub fn income_tax(taxable_income: f64) -> EngineResult<TaxAssessment> {
    if taxable_income < 0.0 {
        return Err(EngineError::invalid(
            "taxable_income",
            "cannot be negative",
        ));
    }

    let mut total_tax = 0.0;
    let mut marginal_rate = TAX_BRACKETS[0].1;

    for (i, &(lower, rate)) in TAX_BRACKETS.iter().enumerate() {
        if taxable_income <= lower {
            break;
        }
        let upper = TAX_BRACKETS
            .get(i + 1)
            .map(|&(next_lower, _)| next_lower)
            .unwrap_or(f64::INFINITY);

        total_tax += (taxable_income.min(upper) - lower) * rate;
        marginal_rate = rate;
    }

    let effective_rate = if taxable_income > 0.0 {
        total_tax / taxable_income
    } else {
        0.0
    };

    Ok(TaxAssessment {
        total_tax,
        effective_rate,
        marginal_rate,
    })
}

/// Audit sample-size result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSample {
    pub sample_size: u32,
    /// Z-score used for the confidence level
    pub z_score: f64,
}

/// Finite-population sample size for attribute testing
///
/// `n = N·z²·p(1−p) / ((N−1)·e² + z²·p(1−p))`, rounded up. A population
/// with no variance (`p` of exactly 0 or 1) needs only a single item —
/// the degenerate branch, not a division by zero.
pub fn audit_sample_size(
    population_size: u32,
    confidence_pct: u32,
    expected_error_rate: f64,
    tolerable_error: f64,
) -> EngineResult<AuditSample> {
    if population_size == 0 {
        return Err(EngineError::invalid(
            "population_size",
            "must be positive",
        ));
    }
    if !(0.0..=1.0).contains(&expected_error_rate) {
        return Err(EngineError::invalid(
            "expected_error_rate",
            "must be in [0, 1]",
        ));
    }
    if tolerable_error <= 0.0 {
        return Err(EngineError::invalid("tolerable_error", "must be positive"));
    }

    let z = z_score_for_confidence(confidence_pct);
    let variance = expected_error_rate * (1.0 - expected_error_rate);

    if variance == 0.0 {
        return Ok(AuditSample {
            sample_size: 1,
            z_score: z,
        });
    }

    let n = population_size as f64;
    let numerator = n * z * z * variance;
    let denominator = (n - 1.0) * tolerable_error * tolerable_error + z * z * variance;

    let sample = (numerator / denominator).ceil() as u32;

    Ok(AuditSample {
        sample_size: sample.min(population_size).max(1),
        z_score: z,
    })
}

/// One year of a depreciation schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationYear {
    pub year: u32,
    pub expense: f64,
    pub accumulated: f64,
    pub book_value: f64,
}

/// Straight-line depreciation schedule
pub fn straight_line_depreciation(
    cost: f64,
    salvage_value: f64,
    useful_life_years: u32,
) -> EngineResult<Vec<DepreciationYear>> {
    validate_depreciation_inputs(cost, salvage_value, useful_life_years)?;

    let expense = (cost - salvage_value) / useful_life_years as f64;
    let mut schedule = Vec::with_capacity(useful_life_years as usize);
    let mut accumulated = 0.0;

    for year in 1..=useful_life_years {
        accumulated += expense;
        schedule.push(DepreciationYear {
            year,
            expense,
            accumulated,
            book_value: cost - accumulated,
        });
    }

    Ok(schedule)
}

/// Double-declining-balance schedule, floored at salvage value
pub fn double_declining_depreciation(
    cost: f64,
    salvage_value: f64,
    useful_life_years: u32,
) -> EngineResult<Vec<DepreciationYear>> {
    validate_depreciation_inputs(cost, salvage_value, useful_life_years)?;

    let rate = 2.0 / useful_life_years as f64;
    let mut schedule = Vec::with_capacity(useful_life_years as usize);
    let mut book_value = cost;
    let mut accumulated = 0.0;

    for year in 1..=useful_life_years {
        // Never depreciate below salvage
        let expense = (book_value * rate).min(book_value - salvage_value).max(0.0);
        book_value -= expense;
        accumulated += expense;
        schedule.push(DepreciationYear {
            year,
            expense,
            accumulated,
            book_value,
        });
    }

    Ok(schedule)
}

fn validate_depreciation_inputs(
    cost: f64,
    salvage_value: f64,
    useful_life_years: u32,
) -> EngineResult<()> {
    if useful_life_years == 0 {
        return Err(EngineError::invalid(
            "useful_life_years",
            "must be at least 1",
        ));
    }
    if salvage_value < 0.0 || cost < salvage_value {
        return Err(EngineError::invalid(
            "salvage_value",
            "must be non-negative and at most the cost",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_tax_first_bracket() {
        let assessment = income_tax(10_000.0).unwrap();
        assert!((assessment.total_tax - 1_000.0).abs() < 1e-9);
        assert!((assessment.marginal_rate - 0.10).abs() < 1e-12);
        assert!((assessment.effective_rate - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_income_tax_spans_brackets() {
        // 60k: 11000×10% + 33725×12% + 15275×22% = 8508.50
        let assessment = income_tax(60_000.0).unwrap();
        assert!((assessment.total_tax - 8_508.50).abs() < 0.01);
        assert!((assessment.marginal_rate - 0.22).abs() < 1e-12);
        assert!(assessment.effective_rate < assessment.marginal_rate);
    }

    #[test]
    fn test_income_tax_zero_income() {
        let assessment = income_tax(0.0).unwrap();
        assert_eq!(assessment.total_tax, 0.0);
        assert_eq!(assessment.effective_rate, 0.0);
    }

    #[test]
    fn test_audit_sample_size_reference() {
        // Large population at 95% (z = 1.645), p=0.5, e=5%:
        // n → z²·p(1-p)/e² ≈ 270.6, rounded up
        let sample = audit_sample_size(1_000_000, 95, 0.5, 0.05).unwrap();
        assert_eq!(sample.sample_size, 271);

        // Small populations cap the sample at the population itself
        let small = audit_sample_size(50, 95, 0.5, 0.05).unwrap();
        assert!(small.sample_size <= 50);

        // Tighter confidence demands a larger sample
        let tighter = audit_sample_size(1_000_000, 99, 0.5, 0.05).unwrap();
        assert!(tighter.sample_size > sample.sample_size);
    }

    #[test]
    fn test_audit_sample_degenerate_variance() {
        // p = 0 or 1: no variance, single item suffices
        assert_eq!(audit_sample_size(1000, 95, 0.0, 0.05).unwrap().sample_size, 1);
        assert_eq!(audit_sample_size(1000, 95, 1.0, 0.05).unwrap().sample_size, 1);
    }

    #[test]
    fn test_audit_sample_zero_population_rejected() {
        assert!(audit_sample_size(0, 95, 0.5, 0.05).is_err());
    }

    #[test]
    fn test_straight_line_schedule() {
        let schedule = straight_line_depreciation(10_000.0, 1_000.0, 5).unwrap();

        assert_eq!(schedule.len(), 5);
        for row in &schedule {
            assert!((row.expense - 1_800.0).abs() < 1e-9);
        }
        assert!((schedule[4].book_value - 1_000.0).abs() < 1e-9);
        assert!((schedule[4].accumulated - 9_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_declining_floors_at_salvage() {
        let schedule = double_declining_depreciation(10_000.0, 1_000.0, 5).unwrap();

        // Year 1: 40% of 10000
        assert!((schedule[0].expense - 4_000.0).abs() < 1e-9);

        // Book value never drops below salvage and ends exactly there
        for row in &schedule {
            assert!(row.book_value >= 1_000.0 - 1e-9);
        }
        assert!((schedule.last().unwrap().book_value - 1_000.0).abs() < 1.0);
    }

    #[test]
    fn test_depreciation_invalid_inputs() {
        assert!(straight_line_depreciation(10_000.0, 1_000.0, 0).is_err());
        assert!(double_declining_depreciation(1_000.0, 2_000.0, 5).is_err());
    }
}
