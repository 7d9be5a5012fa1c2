use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Read counts of one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bin<'a> {
    pub chr: &'a str,
    pub bin_index: usize,
    pub treatment_count: u32,
    pub control_count: u32,
}

///
/// All bins of one chromosome, stored column-wise.
///
/// Treatment counts are kept per strand for the shape tests; unstranded
/// treatment reads only enter the combined count. Control is only needed
/// combined. Built by the binner and not mutated afterwards.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ChromBins {
    pub chr: String,
    pub chrom_size: u32,
    pub bin_width: u32,
    pub treatment_forward: Vec<u32>,
    pub treatment_reverse: Vec<u32>,
    pub treatment_unstranded: Vec<u32>,
    pub control: Vec<u32>,
}

impl ChromBins {
    pub fn len(&self) -> usize {
        self.control.len()
    }

    pub fn is_empty(&self) -> bool {
        self.control.is_empty()
    }

    /// Combined treatment count of bin `i`.
    pub fn treatment(&self, i: usize) -> u32 {
        self.treatment_forward[i] + self.treatment_reverse[i] + self.treatment_unstranded[i]
    }

    pub fn treatment_total(&self) -> u64 {
        self.treatment_forward
            .iter()
            .chain(self.treatment_reverse.iter())
            .chain(self.treatment_unstranded.iter())
            .map(|&c| c as u64)
            .sum()
    }

    pub fn control_total(&self) -> u64 {
        self.control.iter().map(|&c| c as u64).sum()
    }

    /// Genomic `[start, end)` covered by bin `i`; the last bin may be short.
    pub fn bin_bounds(&self, i: usize) -> (u32, u32) {
        let start = i as u32 * self.bin_width;
        let end = start.saturating_add(self.bin_width).min(self.chrom_size);
        (start, end)
    }

    pub fn iter_bins(&self) -> impl Iterator<Item = Bin<'_>> {
        (0..self.len()).map(move |i| Bin {
            chr: &self.chr,
            bin_index: i,
            treatment_count: self.treatment(i),
            control_count: self.control[i],
        })
    }
}

/// Which Triform shape test carried a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakShape {
    /// Centre exceeds both flanks on the combined strands.
    Central,
    /// Forward strand centre exceeds its left flank.
    Left,
    /// Reverse strand centre exceeds its right flank.
    Right,
}

///
/// A scored bin: the unit that goes through multiple-testing correction.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub statistic: f64,
    pub p_value: f64,
    pub shape: Option<PeakShape>,
}

/// A candidate region with its multiple-testing corrected q-value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRegion {
    pub region: CandidateRegion,
    pub q_value: f64,
}

///
/// Final output record. Coordinates are zero-based half-open, like BED.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakCall {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub summit: u32,
    pub score: f64,
    pub q_value: f64,
}

impl PeakCall {
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &PeakCall) -> bool {
        self.chr == other.chr && self.start < other.end && other.start < self.end
    }

    ///
    /// Tab separated line for a BED-like writer:
    /// chr, start, end, summit, score, q-value.
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{:.4}\t{:.6e}",
            self.chr, self.start, self.end, self.summit, self.score, self.q_value
        )
    }
}

impl Display for PeakCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Per-chromosome bookkeeping reported alongside the peaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromSummary {
    pub chr: String,
    pub treatment_reads: u64,
    pub control_reads: u64,
    pub bins: usize,
    pub significant_bins: usize,
    pub peaks: usize,
}
