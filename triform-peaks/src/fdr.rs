//! Multiple-testing correction.
//!
//! q-values come back in the order the p-values went in, so callers keep
//! region identity by position alone.

use crate::config::CorrectionMethod;
use crate::errors::TriformError;
use crate::models::{CandidateRegion, ScoredRegion};

fn check_p_values(p_values: &[f64]) -> Result<(), TriformError> {
    match p_values
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        Some((index, &value)) => Err(TriformError::InvalidPValue { index, value }),
        None => Ok(()),
    }
}

///
/// Benjamini-Hochberg step-up q-values.
///
/// p-values are stable-sorted, so ties keep their input (genomic) order.
/// `q_(j) = min over l >= j of (m / l) * p_(l)`, capped at 1.
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>, TriformError> {
    check_p_values(p_values)?;

    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut q_values = vec![1.0; m];
    let mut running_min = 1.0_f64;
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let adjusted = p_values[idx] * m as f64 / (rank0 + 1) as f64;
        running_min = running_min.min(adjusted);
        q_values[idx] = running_min;
    }

    Ok(q_values)
}

/// Bonferroni adjusted p-values, `min(1, m * p)`.
pub fn bonferroni(p_values: &[f64]) -> Result<Vec<f64>, TriformError> {
    check_p_values(p_values)?;

    let m = p_values.len() as f64;
    Ok(p_values.iter().map(|p| (p * m).min(1.0)).collect())
}

pub fn adjust(p_values: &[f64], method: CorrectionMethod) -> Result<Vec<f64>, TriformError> {
    match method {
        CorrectionMethod::BenjaminiHochberg => benjamini_hochberg(p_values),
        CorrectionMethod::Bonferroni => bonferroni(p_values),
    }
}

///
/// Attach q-values to candidate regions, treating them as one family of tests.
///
pub fn correct_regions(
    regions: Vec<CandidateRegion>,
    method: CorrectionMethod,
) -> Result<Vec<ScoredRegion>, TriformError> {
    let p_values: Vec<f64> = regions.iter().map(|r| r.p_value).collect();
    let q_values = adjust(&p_values, method)?;

    Ok(regions
        .into_iter()
        .zip(q_values)
        .map(|(region, q_value)| ScoredRegion { region, q_value })
        .collect())
}
