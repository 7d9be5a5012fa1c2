//! Per-bin enrichment scoring.
//!
//! A [`PeakScorer`] turns the bins of one chromosome into one
//! [`CandidateRegion`] per bin. Strategies are interchangeable: the
//! pipeline only sees counts going in and statistics coming out.

use statrs::function::erf::erfc;

use crate::models::{CandidateRegion, ChromBins};
use crate::null_model::NullModel;

///
/// What treatment counts are compared against: the fitted control model and
/// the treatment/control library size ratio used to scale control counts.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub model: NullModel,
    pub library_ratio: f64,
}

impl Background {
    pub fn new(model: NullModel, treatment_total: u64, control_total: u64) -> Self {
        let library_ratio = if control_total == 0 {
            0.0
        } else {
            treatment_total as f64 / control_total as f64
        };
        Background {
            model,
            library_ratio,
        }
    }

    /// Treatment count expected in a bin, from the larger of its local
    /// control count and the background mean.
    pub fn expected(&self, control_count: u32) -> f64 {
        self.library_ratio * (control_count as f64).max(self.model.mean())
    }

    /// `P(X >= treatment_count)` under the model centred on [`Background::expected`].
    pub fn p_value(&self, treatment_count: u32, control_count: u32) -> f64 {
        if self.library_ratio <= 0.0 {
            return 1.0;
        }
        self.model
            .with_mean(self.expected(control_count))
            .upper_tail(treatment_count)
    }
}

pub trait PeakScorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, bins: &ChromBins, background: &Background) -> Vec<CandidateRegion>;
}

/// `-log10(p)`, finite even when p underflows to zero.
pub fn statistic_from_p(p_value: f64) -> f64 {
    -p_value.max(f64::MIN_POSITIVE).log10()
}

///
/// z-score for the difference of two Poisson counts, `x` against `ratio * y`.
///
/// Zero when both counts are zero.
pub fn z_score(x: u32, y: u32, ratio: f64) -> f64 {
    let total = x as f64 + y as f64;
    if total == 0.0 || ratio <= 0.0 {
        return 0.0;
    }
    (x as f64 - ratio * y as f64) / (ratio * total).sqrt()
}

/// Upper tail of the standard normal distribution.
pub fn normal_upper_tail(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

/// Scores each bin by its count alone against the background.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonScorer;

impl PeakScorer for PoissonScorer {
    fn name(&self) -> &str {
        "poisson"
    }

    fn score(&self, bins: &ChromBins, background: &Background) -> Vec<CandidateRegion> {
        bins.iter_bins()
            .map(|bin| {
                let p_value = background.p_value(bin.treatment_count, bin.control_count);
                let (start, end) = bins.bin_bounds(bin.bin_index);
                CandidateRegion {
                    chr: bins.chr.clone(),
                    start,
                    end,
                    statistic: statistic_from_p(p_value),
                    p_value,
                    shape: None,
                }
            })
            .collect()
    }
}
