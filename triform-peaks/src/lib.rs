//! ChIP-Seq peak calling over binned read counts.
//!
//! The pipeline takes pre-parsed treatment and control reads and returns
//! peak calls:
//!
//! - [`binning`]: count reads into fixed-width bins per chromosome and strand
//! - [`null_model`]: fit a Poisson or negative binomial background on control bins
//! - [`scoring`] / [`triform`]: pluggable per-bin statistics and p-values
//! - [`fdr`]: Benjamini-Hochberg (or Bonferroni) q-values
//! - [`merge`]: merge significant bins into non-overlapping peaks with summits
//! - [`pipeline`]: run it all, one chromosome per parallel task
//!
//! # Example
//!
//! ```
//! use triform_core::models::{ChromSizes, ReadInterval, ReadSet, Strand};
//! use triform_peaks::{PeakCaller, PeakCallerConfig, PoissonScorer};
//!
//! let sizes: ChromSizes = [("chr1", 2000)].into_iter().collect();
//! let treatment: ReadSet = (0..40)
//!     .map(|i| ReadInterval::new("chr1", 50 * i, 50 * i + 36, Strand::Forward))
//!     .collect();
//! let control: ReadSet = (0..40)
//!     .map(|i| ReadInterval::new("chr1", 45 * i, 45 * i + 36, Strand::Reverse))
//!     .collect();
//!
//! let config = PeakCallerConfig { bin_width: 100, ..Default::default() };
//! let result = PeakCaller::new(config, PoissonScorer)
//!     .call_peaks(&treatment, &control, &sizes)
//!     .unwrap();
//! assert!(result.peaks.is_empty());
//! ```

pub mod binning;
pub mod config;
pub mod errors;
pub mod fdr;
pub mod merge;
pub mod models;
pub mod null_model;
pub mod pipeline;
pub mod scoring;
pub mod triform;

// re-exports
pub use config::{CorrectionMethod, ModelScope, PeakCallerConfig};
pub use errors::{ModelFitError, TriformError};
pub use models::{CandidateRegion, ChromBins, ChromSummary, PeakCall, PeakShape};
pub use null_model::NullModel;
pub use pipeline::{PeakCallResult, PeakCaller};
pub use scoring::{Background, PeakScorer, PoissonScorer};
pub use triform::TriformScorer;
