//! Filter/priority blend into the combined gene score.
//!
//! The logistic coefficients were fitted per prioritiser; genes without a
//! prioritiser that has a fitted blend get the plain mean.

use genorank_common::{CombinationCoefficients, LogisticCoefficients, PriorityKind, PriorityResults};

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Product of every attached prioritiser score, 0 when there are none.
pub fn priority_score(results: &PriorityResults) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score).product()
}

/// Blend selected by the first prioritiser present, in the order
/// HiPhive, ExomeWalker, Phenix.
pub fn blend_for<'c>(
    results: &PriorityResults,
    coefficients: &'c CombinationCoefficients,
) -> Option<&'c LogisticCoefficients> {
    if results.contains(PriorityKind::HiPhive) {
        Some(&coefficients.hiphive)
    } else if results.contains(PriorityKind::ExomeWalker) {
        Some(&coefficients.exomewalker)
    } else if results.contains(PriorityKind::Phenix) {
        Some(&coefficients.phenix)
    } else {
        None
    }
}

pub fn combined_score(
    priority_score: f64,
    filter_score: f64,
    results: &PriorityResults,
    coefficients: &CombinationCoefficients,
) -> f64 {
    match blend_for(results, coefficients) {
        Some(c) => sigmoid(c.intercept + c.priority * priority_score + c.filter * filter_score),
        None => (priority_score + filter_score) / 2.0,
    }
}
