use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::TriformError;

/// Which control bins a null model is fitted on.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelScope {
    /// One model from every control bin in the genome.
    #[default]
    Global,
    /// One model per chromosome. Every chromosome in the genome then needs
    /// control reads with some variation, unplaced contigs included;
    /// otherwise the run fails with [`ModelFitError::ZeroVariance`].
    ///
    /// [`ModelFitError::ZeroVariance`]: crate::errors::ModelFitError::ZeroVariance
    PerChromosome,
}

/// Multiple-testing correction applied to the per-bin p-values.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    #[default]
    BenjaminiHochberg,
    Bonferroni,
}

///
/// Parameters of a peak calling run. Every component receives this
/// explicitly; there is no global state.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PeakCallerConfig {
    /// Genomic bin size in bases.
    pub bin_width: u32,
    /// q-value cutoff; bins need a q-value strictly below it.
    pub fdr_threshold: f64,
    /// Max bases between significant bins that still get merged.
    pub merge_gap: u32,
    /// Bases a read anchor moves towards the 3' end before binning.
    pub read_shift: u32,
    pub model_scope: ModelScope,
    pub correction: CorrectionMethod,
    /// Distance between a centre bin and its flanks in the Triform test.
    pub flank_distance: u32,
    /// Merged peaks narrower than this are dropped.
    pub min_peak_width: u32,
    /// Size of the rayon pool; 0 uses rayon's default.
    pub threads: usize,
}

impl Default for PeakCallerConfig {
    fn default() -> Self {
        PeakCallerConfig {
            bin_width: 200,
            fdr_threshold: 0.05,
            merge_gap: 0,
            read_shift: 0,
            model_scope: ModelScope::Global,
            correction: CorrectionMethod::BenjaminiHochberg,
            flank_distance: 600,
            min_peak_width: 0,
            threads: 0,
        }
    }
}

impl PeakCallerConfig {
    ///
    /// Load a config from a toml file. Missing keys take their defaults.
    ///
    /// # Arguments
    /// - path: Path to the config file (a .toml) file.
    pub fn try_from(path: &Path) -> Result<PeakCallerConfig, TriformError> {
        let toml_str = read_to_string(path)?;
        PeakCallerConfig::from_toml_str(&toml_str)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<PeakCallerConfig, TriformError> {
        let config: PeakCallerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TriformError> {
        if self.bin_width == 0 {
            return Err(TriformError::Config("bin_width must be positive".into()));
        }
        if !(self.fdr_threshold > 0.0 && self.fdr_threshold <= 1.0) {
            return Err(TriformError::Config(format!(
                "fdr_threshold must be in (0, 1], got {}",
                self.fdr_threshold
            )));
        }
        if self.flank_distance < self.bin_width {
            return Err(TriformError::Config(format!(
                "flank_distance ({}) must be at least bin_width ({})",
                self.flank_distance, self.bin_width
            )));
        }
        Ok(())
    }

    /// Flank offset in whole bins, at least one.
    pub fn flank_bins(&self) -> usize {
        ((self.flank_distance / self.bin_width) as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[rstest]
    fn test_default_is_valid() {
        let config = PeakCallerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.flank_bins(), 3);
    }

    #[rstest]
    fn test_from_toml_partial() {
        let config = PeakCallerConfig::from_toml_str(
            r#"
            bin_width = 100
            fdr_threshold = 0.01
            model_scope = "per_chromosome"
            correction = "bonferroni"
            "#,
        )
        .unwrap();

        assert_eq!(config.bin_width, 100);
        assert_eq!(config.fdr_threshold, 0.01);
        assert_eq!(config.model_scope, ModelScope::PerChromosome);
        assert_eq!(config.correction, CorrectionMethod::Bonferroni);
        assert_eq!(config.merge_gap, 0);
        assert_eq!(config.flank_distance, 600);
    }

    #[rstest]
    fn test_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bin_width = 50\nmerge_gap = 100\nflank_distance = 150").unwrap();

        let config = PeakCallerConfig::try_from(file.path()).unwrap();
        assert_eq!(config.bin_width, 50);
        assert_eq!(config.merge_gap, 100);
        assert_eq!(config.flank_bins(), 3);
    }

    #[rstest]
    #[case("bin_width = 0")]
    #[case("fdr_threshold = 0.0")]
    #[case("fdr_threshold = 1.5")]
    #[case("bin_width = 500\nflank_distance = 100")]
    fn test_invalid_config(#[case] toml_str: &str) {
        let result = PeakCallerConfig::from_toml_str(toml_str);
        assert!(matches!(result, Err(TriformError::Config(_))));
    }

    #[rstest]
    fn test_unknown_key_rejected() {
        let result = PeakCallerConfig::from_toml_str("bin_size = 100");
        assert!(matches!(result, Err(TriformError::Toml(_))));
    }
}
