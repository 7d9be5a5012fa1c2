//! End-to-end peak calling.
//!
//! Chromosomes are the unit of parallel work. Each stage maps immutable
//! per-chromosome inputs to owned outputs with rayon and collects them in
//! karyotypic chromosome order, so results never depend on scheduling.
//! Only the multiple-testing correction looks at the whole genome at once.

use log::{debug, info, warn};
use rayon::prelude::*;

use triform_core::models::{ChromSizes, ReadInterval, ReadSet};

use crate::binning::{Binner, validate_chroms};
use crate::config::{ModelScope, PeakCallerConfig};
use crate::errors::TriformError;
use crate::fdr::correct_regions;
use crate::merge::PeakMerger;
use crate::models::{CandidateRegion, ChromBins, ChromSummary, PeakCall, ScoredRegion};
use crate::null_model::NullModel;
use crate::scoring::{Background, PeakScorer};
use crate::triform::TriformScorer;

/// Peaks of a run plus per-chromosome bookkeeping, both in chromosome order.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakCallResult {
    pub peaks: Vec<PeakCall>,
    pub summaries: Vec<ChromSummary>,
}

pub struct PeakCaller<S: PeakScorer> {
    pub config: PeakCallerConfig,
    pub scorer: S,
}

impl PeakCaller<TriformScorer> {
    /// A caller using the Triform shape tests.
    pub fn triform(config: PeakCallerConfig) -> Self {
        let scorer = TriformScorer::new(&config);
        PeakCaller { config, scorer }
    }
}

impl<S: PeakScorer> PeakCaller<S> {
    pub fn new(config: PeakCallerConfig, scorer: S) -> Self {
        PeakCaller { config, scorer }
    }

    ///
    /// Call peaks of a treatment sample against its control.
    ///
    /// # Arguments
    /// - treatment: ChIP reads (pool replicates with [`ReadSet::pool`])
    /// - control: input/background reads
    /// - chrom_sizes: the genome to bin; every read must fall inside it
    pub fn call_peaks(
        &self,
        treatment: &ReadSet,
        control: &ReadSet,
        chrom_sizes: &ChromSizes,
    ) -> Result<PeakCallResult, TriformError> {
        self.config.validate()?;
        validate_chroms(treatment, chrom_sizes)?;
        validate_chroms(control, chrom_sizes)?;

        if self.config.threads == 0 {
            return self.run(treatment, control, chrom_sizes);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| TriformError::ThreadPool(e.to_string()))?;
        pool.install(|| self.run(treatment, control, chrom_sizes))
    }

    fn run(
        &self,
        treatment: &ReadSet,
        control: &ReadSet,
        chrom_sizes: &ChromSizes,
    ) -> Result<PeakCallResult, TriformError> {
        info!(
            "Calling peaks with the {} scorer on {} chromosomes ({} bp): treatment {}, control {}",
            self.scorer.name(),
            chrom_sizes.len(),
            chrom_sizes.total_length(),
            treatment,
            control
        );
        let (forward, reverse, unstranded) = treatment.strand_counts();
        debug!(
            "Treatment strands: {} forward, {} reverse, {} unstranded",
            forward, reverse, unstranded
        );

        let binned = self.bin_genome(treatment, control, chrom_sizes)?;
        let backgrounds = self.fit_backgrounds(&binned)?;

        let candidates: Vec<Vec<CandidateRegion>> = binned
            .par_iter()
            .zip(backgrounds.par_iter())
            .map(|(bins, background)| self.scorer.score(bins, background))
            .collect();

        let lengths: Vec<usize> = candidates.iter().map(|c| c.len()).collect();
        let scored = correct_regions(
            candidates.into_iter().flatten().collect(),
            self.config.correction,
        )?;

        let mut per_chrom: Vec<&[ScoredRegion]> = Vec::with_capacity(lengths.len());
        let mut offset = 0;
        for len in lengths {
            per_chrom.push(&scored[offset..offset + len]);
            offset += len;
        }

        let merger = PeakMerger::new(&self.config);
        let merged: Vec<(Vec<PeakCall>, ChromSummary)> = binned
            .par_iter()
            .zip(per_chrom.par_iter())
            .map(|(bins, regions)| {
                let peaks = merger.merge(regions);
                let summary = ChromSummary {
                    chr: bins.chr.clone(),
                    treatment_reads: bins.treatment_total(),
                    control_reads: bins.control_total(),
                    bins: bins.len(),
                    significant_bins: regions.iter().filter(|r| merger.is_significant(r)).count(),
                    peaks: peaks.len(),
                };
                debug!(
                    "{}: {} significant bins merged into {} peaks",
                    summary.chr, summary.significant_bins, summary.peaks
                );
                (peaks, summary)
            })
            .collect();

        let (peaks, summaries): (Vec<Vec<PeakCall>>, Vec<ChromSummary>) =
            merged.into_iter().unzip();
        let peaks: Vec<PeakCall> = peaks.into_iter().flatten().collect();

        info!(
            "Called {} peaks at FDR < {}",
            peaks.len(),
            self.config.fdr_threshold
        );

        Ok(PeakCallResult { peaks, summaries })
    }

    ///
    /// Bin every chromosome of the genome, in karyotypic order.
    ///
    /// Chromosomes are binned in parallel; if several fail, the error of
    /// the first chromosome in order is returned.
    pub fn bin_genome(
        &self,
        treatment: &ReadSet,
        control: &ReadSet,
        chrom_sizes: &ChromSizes,
    ) -> Result<Vec<ChromBins>, TriformError> {
        let binner = Binner::new(&self.config);
        let treatment_by_chrom = treatment.by_chrom();
        let control_by_chrom = control.by_chrom();
        let no_reads: Vec<&ReadInterval> = Vec::new();

        let chroms = chrom_sizes.chroms();
        let results: Vec<Result<ChromBins, TriformError>> = chroms
            .par_iter()
            .map(|&chr| {
                let size = chrom_sizes.get(chr).unwrap_or(0);
                let t = treatment_by_chrom.get(chr).unwrap_or(&no_reads);
                let c = control_by_chrom.get(chr).unwrap_or(&no_reads);
                if t.is_empty() && c.is_empty() {
                    debug!("{}: no reads", chr);
                }
                binner
                    .bin_chromosome(chr, size, t, c)
                    .map_err(TriformError::from)
            })
            .collect();

        results.into_iter().collect()
    }

    ///
    /// One [`Background`] per chromosome, following the configured model scope.
    ///
    /// The library ratio always comes from genome-wide totals.
    pub fn fit_backgrounds(&self, binned: &[ChromBins]) -> Result<Vec<Background>, TriformError> {
        let treatment_total: u64 = binned.iter().map(|b| b.treatment_total()).sum();
        let control_total: u64 = binned.iter().map(|b| b.control_total()).sum();
        if treatment_total == 0 {
            warn!("Treatment has no reads; nothing can be called");
        }

        match self.config.model_scope {
            ModelScope::Global => {
                let model = NullModel::fit(
                    binned.iter().flat_map(|b| b.control.iter().copied()),
                    "genome",
                )?;
                info!(
                    "Fitted null model {:?} (variance {:.3})",
                    model,
                    model.variance()
                );
                Ok(vec![
                    Background::new(model, treatment_total, control_total);
                    binned.len()
                ])
            }
            ModelScope::PerChromosome => {
                let results: Vec<Result<Background, TriformError>> = binned
                    .par_iter()
                    .map(|bins| -> Result<Background, TriformError> {
                        let model = NullModel::fit(bins.control.iter().copied(), &bins.chr)?;
                        debug!("{}: fitted null model {:?}", bins.chr, model);
                        Ok(Background::new(model, treatment_total, control_total))
                    })
                    .collect();
                results.into_iter().collect()
            }
        }
    }
}
