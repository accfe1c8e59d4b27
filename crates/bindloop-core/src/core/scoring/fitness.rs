use super::metrics::MetricSet;
use thiserror::Error;

pub const DEFAULT_COMPACTNESS_THRESHOLD_NM: f64 = 2.5;
pub const DEFAULT_INTERFACE_ERROR_WEIGHT: f64 = 0.2;

#[derive(Debug, Error, PartialEq)]
pub enum FitnessError {
    #[error("Fitness term '{term}' is outside its domain (value: {value})")]
    InvalidDomain { term: &'static str, value: f64 },
}

/// Log-space composite fitness of a candidate.
///
/// ```text
/// score = ln(confidence / 100) + ln(agreement)
///         - w * ln(interface_error)
///         - max(0, compactness - threshold)
/// loss  = -score
/// ```
///
/// An infinite interface error (no contact between binder and target) yields a score of
/// `-inf`, i.e. a loss of `+inf`, regardless of the other terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessFunction {
    pub compactness_threshold: f64,
    pub interface_error_weight: f64,
}

impl Default for FitnessFunction {
    fn default() -> Self {
        Self {
            compactness_threshold: DEFAULT_COMPACTNESS_THRESHOLD_NM,
            interface_error_weight: DEFAULT_INTERFACE_ERROR_WEIGHT,
        }
    }
}

fn require_positive(term: &'static str, value: f64) -> Result<f64, FitnessError> {
    if value.is_nan() || value <= 0.0 {
        return Err(FitnessError::InvalidDomain { term, value });
    }
    Ok(value)
}

impl FitnessFunction {
    pub fn new(compactness_threshold: f64, interface_error_weight: f64) -> Self {
        Self {
            compactness_threshold,
            interface_error_weight,
        }
    }

    #[inline]
    pub fn compactness_penalty(&self, compactness: f64) -> f64 {
        (compactness - self.compactness_threshold).max(0.0)
    }

    pub fn score(&self, metrics: &MetricSet) -> Result<f64, FitnessError> {
        let confidence = require_positive("confidence", metrics.confidence)?;
        let agreement = require_positive("agreement", metrics.agreement)?;
        let interface_error = require_positive("interface_error", metrics.interface_error)?;
        if metrics.compactness.is_nan() || metrics.compactness < 0.0 {
            return Err(FitnessError::InvalidDomain {
                term: "compactness",
                value: metrics.compactness,
            });
        }

        if interface_error == f64::INFINITY {
            return Ok(f64::NEG_INFINITY);
        }

        let score = (confidence / 100.0).ln() + agreement.ln()
            - self.interface_error_weight * interface_error.ln()
            - self.compactness_penalty(metrics.compactness);
        if score.is_nan() {
            return Err(FitnessError::InvalidDomain {
                term: "score",
                value: score,
            });
        }
        Ok(score)
    }

    pub fn loss(&self, metrics: &MetricSet) -> Result<f64, FitnessError> {
        self.score(metrics).map(|score| -score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn metrics(confidence: f64, agreement: f64, interface_error: f64, compactness: f64) -> MetricSet {
        MetricSet {
            confidence,
            agreement,
            same_chain_agreement: 0.9,
            interface_error,
            compactness,
        }
    }

    #[test]
    fn loss_matches_closed_form() {
        let fitness = FitnessFunction::default();
        let m = metrics(85.0, 0.7, 6.0, 3.1);
        let expected = -((0.85f64).ln() + (0.7f64).ln() - 0.2 * (6.0f64).ln() - 0.6);
        assert!((fitness.loss(&m).unwrap() - expected).abs() < TOLERANCE);
    }

    #[test]
    fn compact_binder_has_no_penalty() {
        let fitness = FitnessFunction::default();
        assert_eq!(fitness.compactness_penalty(1.8), 0.0);
        assert_eq!(fitness.compactness_penalty(2.5), 0.0);
        assert!((fitness.compactness_penalty(3.0) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn perfect_candidate_has_zero_loss() {
        let fitness = FitnessFunction::default();
        let loss = fitness.loss(&metrics(100.0, 1.0, 1.0, 1.0)).unwrap();
        assert!(loss.abs() < TOLERANCE);
    }

    #[test]
    fn no_interface_is_a_hard_veto() {
        let fitness = FitnessFunction::default();
        let loss = fitness.loss(&metrics(95.0, 0.9, f64::INFINITY, 1.0)).unwrap();
        assert_eq!(loss, f64::INFINITY);
    }

    #[test]
    fn weight_and_threshold_are_configurable() {
        let fitness = FitnessFunction::new(1.0, 0.0);
        let loss = fitness.loss(&metrics(100.0, 1.0, 20.0, 1.5)).unwrap();
        assert!((loss - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn out_of_domain_terms_are_rejected() {
        let fitness = FitnessFunction::default();
        let cases = [
            (metrics(0.0, 0.5, 5.0, 1.0), "confidence"),
            (metrics(80.0, 0.0, 5.0, 1.0), "agreement"),
            (metrics(80.0, -0.1, 5.0, 1.0), "agreement"),
            (metrics(80.0, 0.5, -1.0, 1.0), "interface_error"),
            (metrics(f64::NAN, 0.5, 5.0, 1.0), "confidence"),
            (metrics(80.0, 0.5, 5.0, f64::NAN), "compactness"),
        ];
        for (m, expected) in cases {
            match fitness.loss(&m) {
                Err(FitnessError::InvalidDomain { term, .. }) => assert_eq!(term, expected),
                other => panic!("expected domain error for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn nan_result_is_rejected() {
        let fitness = FitnessFunction::default();
        // inf confidence with an inf compactness penalty gives inf - inf.
        let err = fitness
            .loss(&metrics(f64::INFINITY, 0.5, 5.0, f64::INFINITY))
            .unwrap_err();
        assert!(matches!(err, FitnessError::InvalidDomain { term: "score", .. }));
    }
}
