//! Background distribution of bin counts, fitted on control signal.

use statrs::distribution::{DiscreteCDF, NegativeBinomial, Poisson};

use crate::errors::ModelFitError;

///
/// Null distribution of the read count of a single bin.
///
/// Overdispersed control data (variance above the mean) gets a negative
/// binomial with method-of-moments dispersion; everything else a Poisson.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NullModel {
    Poisson { lambda: f64 },
    /// `variance = mean + mean^2 / dispersion`
    NegativeBinomial { mean: f64, dispersion: f64 },
}

impl NullModel {
    ///
    /// Fit a model on control bin counts.
    ///
    /// # Arguments
    /// - counts: control count of every bin in scope
    /// - scope: chromosome name (or `genome`) used in error messages
    pub fn fit<I>(counts: I, scope: &str) -> Result<NullModel, ModelFitError>
    where
        I: IntoIterator<Item = u32>,
    {
        // Welford's running mean and sum of squared deviations
        let mut n: u64 = 0;
        let mut mean = 0.0_f64;
        let mut m2 = 0.0_f64;
        let mut min = u32::MAX;
        let mut max = 0_u32;

        for count in counts {
            n += 1;
            min = min.min(count);
            max = max.max(count);
            let x = count as f64;
            let delta = x - mean;
            mean += delta / n as f64;
            m2 += delta * (x - mean);
        }

        if n < 2 {
            return Err(ModelFitError::InsufficientData {
                scope: scope.to_string(),
            });
        }
        if min == max {
            return Err(ModelFitError::ZeroVariance {
                scope: scope.to_string(),
                value: min as f64,
            });
        }

        let variance = m2 / (n - 1) as f64;
        if !(mean.is_finite() && variance.is_finite()) {
            return Err(ModelFitError::InvalidParameters {
                scope: scope.to_string(),
                reason: format!("mean {} and variance {} must be finite", mean, variance),
            });
        }

        if variance <= mean {
            Ok(NullModel::Poisson { lambda: mean })
        } else {
            Ok(NullModel::NegativeBinomial {
                mean,
                dispersion: mean * mean / (variance - mean),
            })
        }
    }

    pub fn mean(&self) -> f64 {
        match *self {
            NullModel::Poisson { lambda } => lambda,
            NullModel::NegativeBinomial { mean, .. } => mean,
        }
    }

    pub fn variance(&self) -> f64 {
        match *self {
            NullModel::Poisson { lambda } => lambda,
            NullModel::NegativeBinomial { mean, dispersion } => mean + mean * mean / dispersion,
        }
    }

    /// Same family and dispersion, centred on another mean.
    pub fn with_mean(&self, mean: f64) -> NullModel {
        match *self {
            NullModel::Poisson { .. } => NullModel::Poisson { lambda: mean },
            NullModel::NegativeBinomial { dispersion, .. } => {
                NullModel::NegativeBinomial { mean, dispersion }
            }
        }
    }

    ///
    /// `P(X >= k)` under this model.
    ///
    /// A model centred on zero puts all mass on zero.
    pub fn upper_tail(&self, k: u32) -> f64 {
        if k == 0 {
            return 1.0;
        }
        if self.mean() <= 0.0 {
            return 0.0;
        }

        let x = (k - 1) as u64;
        let tail = match *self {
            NullModel::Poisson { lambda } => Poisson::new(lambda).ok().map(|d| d.sf(x)),
            NullModel::NegativeBinomial { mean, dispersion } => {
                let p = dispersion / (dispersion + mean);
                NegativeBinomial::new(dispersion, p).ok().map(|d| d.sf(x))
            }
        };
        // parameters that statrs rejects can't reject the null either
        tail.unwrap_or(1.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[rstest]
    fn test_fit_poisson() {
        // mean 10, sample variance 2/3
        let model = NullModel::fit(vec![9, 10, 11, 10], "chr1").unwrap();
        match model {
            NullModel::Poisson { lambda } => assert_close(lambda, 10.0),
            other => panic!("expected Poisson, got {:?}", other),
        }
    }

    #[rstest]
    fn test_fit_negative_binomial() {
        // mean 5, sample variance 100 / 4
        let model = NullModel::fit(vec![0, 10, 0, 10, 5], "genome").unwrap();
        match model {
            NullModel::NegativeBinomial { mean, dispersion } => {
                let variance = 25.0;
                assert_close(mean, 5.0);
                assert_close(dispersion, 25.0 / (variance - 5.0));
                assert_close(model.variance(), variance);
            }
            other => panic!("expected negative binomial, got {:?}", other),
        }
    }

    #[rstest]
    #[case(vec![4, 4, 4, 4], 4.0)]
    #[case(vec![0, 0, 0], 0.0)]
    fn test_zero_variance_rejected(#[case] counts: Vec<u32>, #[case] value: f64) {
        let err = NullModel::fit(counts, "chr2").unwrap_err();
        assert_eq!(
            err,
            ModelFitError::ZeroVariance {
                scope: "chr2".to_string(),
                value,
            }
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![7])]
    fn test_insufficient_data(#[case] counts: Vec<u32>) {
        let err = NullModel::fit(counts, "chrM").unwrap_err();
        assert!(matches!(err, ModelFitError::InsufficientData { .. }));
        assert!(err.to_string().contains("chrM"));
    }

    #[rstest]
    fn test_upper_tail_poisson() {
        let model = NullModel::Poisson { lambda: 2.0 };
        assert_eq!(model.upper_tail(0), 1.0);
        // P(X >= 1) = 1 - e^-2
        assert_close(model.upper_tail(1), 1.0 - (-2.0_f64).exp());
        // P(X >= 3) = 1 - e^-2 (1 + 2 + 2)
        assert_close(model.upper_tail(3), 1.0 - 5.0 * (-2.0_f64).exp());
        assert!(model.upper_tail(50) < 1e-30);
    }

    #[rstest]
    fn test_upper_tail_decreasing() {
        let model = NullModel::NegativeBinomial {
            mean: 10.0,
            dispersion: 4.0,
        };
        let tails: Vec<f64> = (0..60).map(|k| model.upper_tail(k)).collect();
        assert!(tails.windows(2).all(|w| w[1] <= w[0]));
        // the heavier negative binomial tail beats a Poisson of equal mean
        assert!(model.upper_tail(30) > NullModel::Poisson { lambda: 10.0 }.upper_tail(30));
    }

    #[rstest]
    fn test_with_mean_keeps_family() {
        let nb = NullModel::NegativeBinomial {
            mean: 3.0,
            dispersion: 2.0,
        };
        assert_eq!(
            nb.with_mean(8.0),
            NullModel::NegativeBinomial {
                mean: 8.0,
                dispersion: 2.0,
            }
        );
        assert_eq!(NullModel::Poisson { lambda: 1.0 }.with_mean(0.0).upper_tail(1), 0.0);
    }
}
