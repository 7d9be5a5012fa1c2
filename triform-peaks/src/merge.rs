//! Merging significant bins into peak calls.

use crate::config::PeakCallerConfig;
use crate::models::{PeakCall, ScoredRegion};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakMerger {
    pub fdr_threshold: f64,
    pub merge_gap: u32,
    pub min_peak_width: u32,
}

impl PeakMerger {
    pub fn new(config: &PeakCallerConfig) -> Self {
        PeakMerger {
            fdr_threshold: config.fdr_threshold,
            merge_gap: config.merge_gap,
            min_peak_width: config.min_peak_width,
        }
    }

    pub fn is_significant(&self, region: &ScoredRegion) -> bool {
        region.q_value < self.fdr_threshold
    }

    ///
    /// Merge the significant regions into peak calls.
    ///
    /// Every significant region starts as a one-bin peak whose summit is the
    /// bin midpoint; these are then merged with [`merge_peaks`]. Peaks
    /// narrower than `min_peak_width` are dropped afterwards.
    pub fn merge(&self, regions: &[ScoredRegion]) -> Vec<PeakCall> {
        let peaks: Vec<PeakCall> = regions
            .iter()
            .filter(|r| self.is_significant(r))
            .map(|r| PeakCall {
                chr: r.region.chr.clone(),
                start: r.region.start,
                end: r.region.end,
                summit: r.region.start + (r.region.end - r.region.start) / 2,
                score: r.region.statistic,
                q_value: r.q_value,
            })
            .collect();

        merge_peaks(peaks, self.merge_gap)
            .into_iter()
            .filter(|p| p.width() >= self.min_peak_width)
            .collect()
    }
}

///
/// Merge peaks on the same chromosome that overlap or lie at most
/// `merge_gap` bases apart.
///
/// The merged peak keeps the summit and score of its highest scoring member
/// (the leftmost on ties) and the smallest q-value. The result is sorted by
/// chromosome and start and contains no overlapping peaks; merging it again
/// changes nothing.
pub fn merge_peaks(mut peaks: Vec<PeakCall>, merge_gap: u32) -> Vec<PeakCall> {
    peaks.sort_by(|a, b| (&a.chr, a.start, a.end).cmp(&(&b.chr, b.start, b.end)));

    let mut merged: Vec<PeakCall> = Vec::with_capacity(peaks.len());
    for peak in peaks {
        match merged.last_mut() {
            Some(current)
                if current.chr == peak.chr
                    && peak.start as u64 <= current.end as u64 + merge_gap as u64 =>
            {
                current.end = current.end.max(peak.end);
                current.q_value = current.q_value.min(peak.q_value);
                if peak.score > current.score {
                    current.score = peak.score;
                    current.summit = peak.summit;
                }
            }
            _ => merged.push(peak),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateRegion;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn scored(chr: &str, start: u32, statistic: f64, q_value: f64) -> ScoredRegion {
        ScoredRegion {
            region: CandidateRegion {
                chr: chr.to_string(),
                start,
                end: start + 100,
                statistic,
                p_value: q_value / 10.0,
                shape: None,
            },
            q_value,
        }
    }

    fn peak(chr: &str, start: u32, end: u32, score: f64) -> PeakCall {
        PeakCall {
            chr: chr.to_string(),
            start,
            end,
            summit: start + (end - start) / 2,
            score,
            q_value: 0.01,
        }
    }

    #[fixture]
    fn merger() -> PeakMerger {
        PeakMerger {
            fdr_threshold: 0.05,
            merge_gap: 0,
            min_peak_width: 0,
        }
    }

    #[rstest]
    fn test_adjacent_bins_merge(merger: PeakMerger) {
        let regions = vec![
            scored("chr1", 0, 2.0, 0.5),
            scored("chr1", 100, 4.0, 0.01),
            scored("chr1", 200, 9.0, 0.001),
            scored("chr1", 300, 3.0, 0.04),
            scored("chr1", 400, 1.0, 0.3),
            scored("chr1", 500, 5.0, 0.02),
        ];

        let peaks = merger.merge(&regions);
        assert_eq!(
            peaks,
            vec![
                PeakCall {
                    chr: "chr1".to_string(),
                    start: 100,
                    end: 400,
                    summit: 250,
                    score: 9.0,
                    q_value: 0.001,
                },
                PeakCall {
                    chr: "chr1".to_string(),
                    start: 500,
                    end: 600,
                    summit: 550,
                    score: 5.0,
                    q_value: 0.02,
                },
            ]
        );
    }

    #[rstest]
    fn test_threshold_is_strict(merger: PeakMerger) {
        let peaks = merger.merge(&[scored("chr1", 0, 3.0, 0.05)]);
        assert!(peaks.is_empty());
    }

    #[rstest]
    #[case(99, 2)]
    #[case(100, 1)]
    fn test_merge_gap(#[case] merge_gap: u32, #[case] expected: usize) {
        let merger = PeakMerger {
            fdr_threshold: 0.05,
            merge_gap,
            min_peak_width: 0,
        };
        let regions = vec![scored("chr1", 0, 3.0, 0.01), scored("chr1", 200, 3.0, 0.01)];
        assert_eq!(merger.merge(&regions).len(), expected);
    }

    #[rstest]
    fn test_summit_tie_goes_left(merger: PeakMerger) {
        let regions = vec![scored("chr1", 0, 7.0, 0.01), scored("chr1", 100, 7.0, 0.01)];
        let peaks = merger.merge(&regions);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].summit, 50);
    }

    #[rstest]
    fn test_chromosomes_never_merge(merger: PeakMerger) {
        let regions = vec![scored("chr2", 0, 3.0, 0.01), scored("chr1", 100, 3.0, 0.01)];
        let peaks = merger.merge(&regions);
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].chr, "chr1");
    }

    #[rstest]
    fn test_min_peak_width() {
        let merger = PeakMerger {
            fdr_threshold: 0.05,
            merge_gap: 0,
            min_peak_width: 200,
        };
        let regions = vec![
            scored("chr1", 0, 3.0, 0.01),
            scored("chr1", 100, 3.0, 0.01),
            scored("chr1", 500, 3.0, 0.01),
        ];
        let peaks = merger.merge(&regions);
        assert_eq!(peaks.len(), 1);
        assert_eq!((peaks[0].start, peaks[0].end), (0, 200));
    }

    #[rstest]
    #[case(0)]
    #[case(150)]
    #[case(1000)]
    fn test_merge_peaks_idempotent(#[case] merge_gap: u32) {
        let peaks = vec![
            peak("chr1", 500, 700, 2.0),
            peak("chr1", 0, 100, 1.0),
            peak("chr1", 50, 250, 3.0),
            peak("chr1", 1200, 1300, 6.0),
            peak("chr2", 0, 100, 1.0),
            peak("chr1", 650, 900, 4.0),
        ];

        let once = merge_peaks(peaks, merge_gap);
        let twice = merge_peaks(once.clone(), merge_gap);
        assert_eq!(once, twice);

        assert!(once.windows(2).all(|w| !w[0].overlaps(&w[1])));
    }

    #[rstest]
    fn test_merge_peaks_overlapping() {
        let merged = merge_peaks(
            vec![peak("chr1", 0, 100, 1.0), peak("chr1", 50, 250, 3.0)],
            0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (0, 250));
        assert_eq!(merged[0].summit, 150);
        assert_eq!(merged[0].score, 3.0);
    }
}
