//! Triple-comparison scoring of peak shape.
//!
//! A binding site shows up as a pile of forward-strand reads just upstream
//! of it and reverse-strand reads just downstream. Each bin is tested three
//! ways against the bins `flank_bins` away:
//!
//! - central: combined treatment count exceeds both flanks
//! - left: forward strand count exceeds its left flank
//! - right: reverse strand count exceeds its right flank
//!
//! The strongest shape test is intersected with enrichment over control
//! (the larger of the two p-values is reported), so a bin has to both look
//! like a peak and rise above the background.

use crate::config::PeakCallerConfig;
use crate::models::{CandidateRegion, ChromBins, PeakShape};
use crate::scoring::{Background, PeakScorer, normal_upper_tail, statistic_from_p, z_score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriformScorer {
    pub flank_bins: usize,
}

impl TriformScorer {
    pub fn new(config: &PeakCallerConfig) -> Self {
        TriformScorer {
            flank_bins: config.flank_bins(),
        }
    }

    ///
    /// Best shape z-score of bin `i` and the test that produced it.
    ///
    /// Flanks past either chromosome end count as empty. Ties go to
    /// central, then left.
    pub fn shape_z(&self, bins: &ChromBins, i: usize) -> (f64, PeakShape) {
        let k = self.flank_bins;
        let left = i.checked_sub(k);
        let right = Some(i + k).filter(|&j| j < bins.len());

        let at = |column: &[u32], j: Option<usize>| j.map_or(0, |j| column[j]);
        let combined = |j: Option<usize>| j.map_or(0, |j| bins.treatment(j));

        let centre = bins.treatment(i);
        let central =
            z_score(centre, combined(left), 1.0).min(z_score(centre, combined(right), 1.0));
        let left_z = z_score(
            bins.treatment_forward[i],
            at(&bins.treatment_forward, left),
            1.0,
        );
        let right_z = z_score(
            bins.treatment_reverse[i],
            at(&bins.treatment_reverse, right),
            1.0,
        );

        [
            (central, PeakShape::Central),
            (left_z, PeakShape::Left),
            (right_z, PeakShape::Right),
        ]
        .into_iter()
        .fold((f64::NEG_INFINITY, PeakShape::Central), |best, cur| {
            if cur.0 > best.0 { cur } else { best }
        })
    }
}

impl PeakScorer for TriformScorer {
    fn name(&self) -> &str {
        "triform"
    }

    fn score(&self, bins: &ChromBins, background: &Background) -> Vec<CandidateRegion> {
        (0..bins.len())
            .map(|i| {
                let (z, shape) = self.shape_z(bins, i);
                let p_enrichment = background.p_value(bins.treatment(i), bins.control[i]);
                let p_value = p_enrichment.max(normal_upper_tail(z));
                let (start, end) = bins.bin_bounds(i);

                CandidateRegion {
                    chr: bins.chr.clone(),
                    start,
                    end,
                    statistic: statistic_from_p(p_value),
                    p_value,
                    shape: Some(shape),
                }
            })
            .collect()
    }
}
