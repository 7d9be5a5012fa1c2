//! Fixed-width binning of aligned reads.
//!
//! Each read is counted once, in the bin holding its anchor position (see
//! [`ReadInterval::anchor`]), so the bin counts of a chromosome always sum
//! to its number of reads.

use log::debug;

use triform_core::ValidationError;
use triform_core::models::{ChromSizes, ReadInterval, ReadSet, Strand};

use crate::config::PeakCallerConfig;
use crate::models::ChromBins;

/// Per-strand counts for one sample on one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandCounts {
    pub forward: Vec<u32>,
    pub reverse: Vec<u32>,
    pub unstranded: Vec<u32>,
}

impl StrandCounts {
    fn zeros(n_bins: usize) -> Self {
        StrandCounts {
            forward: vec![0; n_bins],
            reverse: vec![0; n_bins],
            unstranded: vec![0; n_bins],
        }
    }

    /// Forward, reverse and unstranded counts summed per bin.
    pub fn combined(&self) -> Vec<u32> {
        self.forward
            .iter()
            .zip(&self.reverse)
            .zip(&self.unstranded)
            .map(|((f, r), u)| f + r + u)
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.combined().iter().map(|&c| c as u64).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binner {
    pub bin_width: u32,
    pub read_shift: u32,
}

impl Binner {
    pub fn new(config: &PeakCallerConfig) -> Self {
        Binner {
            bin_width: config.bin_width,
            read_shift: config.read_shift,
        }
    }

    /// Number of bins covering a chromosome; the last one may be short.
    pub fn n_bins(&self, chrom_size: u32) -> usize {
        chrom_size.div_ceil(self.bin_width) as usize
    }

    ///
    /// Count reads of one sample into the bins of one chromosome.
    ///
    /// Fails on the first read that is empty, inverted, or reaches past the
    /// chromosome end.
    pub fn count<'a, I>(
        &self,
        chr: &str,
        chrom_size: u32,
        reads: I,
    ) -> Result<StrandCounts, ValidationError>
    where
        I: IntoIterator<Item = &'a ReadInterval>,
    {
        let mut counts = StrandCounts::zeros(self.n_bins(chrom_size));

        for read in reads {
            debug_assert_eq!(read.chr, chr);
            read.validate(chrom_size)?;

            let bin = (read.anchor(self.read_shift, chrom_size) / self.bin_width) as usize;
            match read.strand {
                Strand::Forward => counts.forward[bin] += 1,
                Strand::Reverse => counts.reverse[bin] += 1,
                Strand::Unstranded => counts.unstranded[bin] += 1,
            }
        }

        Ok(counts)
    }

    ///
    /// Bin treatment and control reads of one chromosome.
    ///
    /// An empty chromosome yields all-zero bins.
    pub fn bin_chromosome(
        &self,
        chr: &str,
        chrom_size: u32,
        treatment: &[&ReadInterval],
        control: &[&ReadInterval],
    ) -> Result<ChromBins, ValidationError> {
        let treatment_counts = self.count(chr, chrom_size, treatment.iter().copied())?;
        let control_counts = self.count(chr, chrom_size, control.iter().copied())?;

        debug!(
            "{}: {} bins, {} treatment reads, {} control reads",
            chr,
            self.n_bins(chrom_size),
            treatment_counts.total(),
            control_counts.total()
        );

        Ok(ChromBins {
            chr: chr.to_string(),
            chrom_size,
            bin_width: self.bin_width,
            treatment_forward: treatment_counts.forward,
            treatment_reverse: treatment_counts.reverse,
            treatment_unstranded: treatment_counts.unstranded,
            control: control_counts.combined(),
        })
    }
}

///
/// Make sure every read sits on a chromosome with a known size.
///
/// Reports the first offending read in input order.
pub fn validate_chroms(reads: &ReadSet, chrom_sizes: &ChromSizes) -> Result<(), ValidationError> {
    // chromosomes come in order of first appearance
    let unknown = reads
        .iter_chroms()
        .find(|chr| !chrom_sizes.contains(chr.as_str()));
    match unknown.and_then(|chr| reads.iter_chr_reads(chr).next()) {
        Some(read) => Err(ValidationError::UnknownChromosome {
            chr: read.chr.clone(),
            start: read.start,
            end: read.end,
        }),
        None => Ok(()),
    }
}
