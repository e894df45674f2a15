use std::collections::BTreeMap;

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_elasticnet::ElasticNet;
use ndarray::{Array1, Array2, Axis};

use crate::config::{LearnerConfig, LearnerKind};
use crate::error::DecodeError;
use crate::feature_selection::univariate_selection::{f_classif, select_percentile};
use crate::models::classifier_trait::TabularLearner;

/// Sparsity-inducing linear classifier.
///
/// Fits an elastic-net regression on +/-1.0 targets and classifies by the
/// sign of the decision value. `l1_ratio` 1.0 gives the lasso, 0.0 ridge.
/// With `screening_percentile` below 100 the features are univariately
/// screened before the fit and the learned coefficients are scattered back
/// to full feature width, so unmasking stays valid.
pub struct SparseLinearClassifier {
    model: Option<ElasticNet<f64>>,
    penalty: f64,
    l1_ratio: f64,
    screening_percentile: f64,
    max_iterations: u64,
    kept: Vec<usize>,
    coef: Option<Array1<f32>>,
    n_features: usize,
}

impl SparseLinearClassifier {
    pub fn new(config: LearnerConfig) -> Result<Self, DecodeError> {
        let LearnerKind::SparseLinear {
            penalty,
            l1_ratio,
            screening_percentile,
        } = config.learner_type
        else {
            return Err(DecodeError::InvalidParameter(
                "SparseLinearClassifier requires LearnerKind::SparseLinear".to_string(),
            ));
        };

        if penalty < 0.0 {
            return Err(DecodeError::InvalidParameter(format!(
                "penalty must be non-negative, got {}",
                penalty
            )));
        }
        if !(0.0..=1.0).contains(&l1_ratio) {
            return Err(DecodeError::InvalidParameter(format!(
                "l1_ratio must be within [0, 1], got {}",
                l1_ratio
            )));
        }
        if !(screening_percentile > 0.0 && screening_percentile <= 100.0) {
            return Err(DecodeError::InvalidParameter(format!(
                "screening_percentile must be within (0, 100], got {}",
                screening_percentile
            )));
        }

        Ok(SparseLinearClassifier {
            model: None,
            penalty,
            l1_ratio,
            screening_percentile,
            max_iterations: config.max_iterations,
            kept: Vec::new(),
            coef: None,
            n_features: 0,
        })
    }
}

impl TabularLearner for SparseLinearClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), DecodeError> {
        if x.nrows() != y.len() {
            return Err(DecodeError::LengthMismatch {
                samples: x.nrows(),
                labels: y.len(),
            });
        }

        self.n_features = x.ncols();
        self.kept = if self.screening_percentile < 100.0 {
            let (f_scores, _) = f_classif(x, y);
            let kept = select_percentile(&f_scores, self.screening_percentile);
            log::debug!(
                "Screening kept {} of {} features (top {}%)",
                kept.len(),
                x.ncols(),
                self.screening_percentile
            );
            kept
        } else {
            (0..x.ncols()).collect()
        };

        let x_fit = x.select(Axis(1), &self.kept).mapv(|v| v as f64);
        // Regress on signed targets, a la RidgeClassifier
        let targets =
            Array1::from_iter(y.iter().map(|&l| if l == 1 { 1.0f64 } else { -1.0f64 }));
        let dataset = Dataset::new(x_fit, targets);

        let model = ElasticNet::params()
            .penalty(self.penalty)
            .l1_ratio(self.l1_ratio)
            .max_iterations(self.max_iterations as u32)
            .fit(&dataset)
            .map_err(|e| DecodeError::Fit {
                model: self.name(),
                message: e.to_string(),
            })?;

        let mut full = Array1::zeros(self.n_features);
        for (pos, &idx) in self.kept.iter().enumerate() {
            full[idx] = model.hyperplane()[pos] as f32;
        }
        self.coef = Some(full);
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, DecodeError> {
        let scores = self.decision_function(x)?;
        Ok(scores
            .iter()
            .map(|&s| if s >= 0.0 { 1 } else { -1 })
            .collect())
    }

    fn decision_function(&self, x: &Array2<f32>) -> Result<Vec<f32>, DecodeError> {
        let model = self
            .model
            .as_ref()
            .ok_or(DecodeError::NotFitted(self.name()))?;
        if x.ncols() != self.n_features {
            return Err(DecodeError::ShapeMismatch {
                expected: format!("{} feature columns", self.n_features),
                found: format!("{} columns", x.ncols()),
            });
        }

        let x_sel = x.select(Axis(1), &self.kept).mapv(|v| v as f64);
        let scores: Array1<f64> = model.predict(&x_sel);
        Ok(scores.iter().map(|&v| v as f32).collect())
    }

    fn coefficients(&self) -> Option<Array1<f32>> {
        self.coef.clone()
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("penalty".to_string(), self.penalty.to_string()),
            ("l1_ratio".to_string(), self.l1_ratio.to_string()),
            (
                "screening_percentile".to_string(),
                self.screening_percentile.to_string(),
            ),
            (
                "max_iterations".to_string(),
                self.max_iterations.to_string(),
            ),
        ])
    }

    fn name(&self) -> &'static str {
        "SparseLinearClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearnerConfig;

    fn separable_data() -> (Array2<f32>, Vec<i32>) {
        // second feature carries the classes, the others are noise
        let x = Array2::from_shape_vec(
            (8, 3),
            vec![
                0.5, 2.0, 1.1, 0.4, -2.1, 0.9, 0.6, 1.9, 1.0, 0.3, -1.8, 1.2, 0.7, 2.2, 0.8,
                0.5, -2.0, 1.1, 0.4, 1.8, 0.9, 0.6, -2.2, 1.0,
            ],
        )
        .unwrap();
        let y = vec![1, -1, 1, -1, 1, -1, 1, -1];
        (x, y)
    }

    fn config(screening_percentile: f64) -> LearnerConfig {
        LearnerConfig::new(
            1000,
            LearnerKind::SparseLinear {
                penalty: 0.01,
                l1_ratio: 1.0,
                screening_percentile,
            },
        )
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (x, y) = separable_data();
        let mut clf = SparseLinearClassifier::new(config(100.0)).unwrap();
        clf.fit(&x, &y).unwrap();
        assert_eq!(clf.predict(&x).unwrap(), y);

        let coef = clf.coefficients().unwrap();
        assert_eq!(coef.len(), 3);
        assert!(coef[1].abs() > 1e-3);
    }

    #[test]
    fn test_screening_scatters_back_to_full_width() {
        let (x, y) = separable_data();
        // 1% of 3 features keeps exactly the best one
        let mut clf = SparseLinearClassifier::new(config(1.0)).unwrap();
        clf.fit(&x, &y).unwrap();

        let coef = clf.coefficients().unwrap();
        assert_eq!(coef.len(), 3);
        // screened-out features keep a zero coefficient
        assert_eq!(coef[0], 0.0);
        assert_eq!(coef[2], 0.0);
        assert!(coef[1].abs() > 1e-3);
        assert_eq!(clf.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_invalid_parameters_fail_at_construction() {
        let config = LearnerConfig::new(
            1000,
            LearnerKind::SparseLinear {
                penalty: 0.1,
                l1_ratio: 1.5,
                screening_percentile: 100.0,
            },
        );
        assert!(matches!(
            SparseLinearClassifier::new(config),
            Err(DecodeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_predict_before_fit_is_an_error() {
        let (x, _) = separable_data();
        let clf = SparseLinearClassifier::new(config(100.0)).unwrap();
        assert!(matches!(
            clf.predict(&x),
            Err(DecodeError::NotFitted(_))
        ));
    }
}
