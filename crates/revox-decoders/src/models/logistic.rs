use std::collections::BTreeMap;

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use crate::config::{LearnerConfig, LearnerKind};
use crate::error::DecodeError;
use crate::models::classifier_trait::TabularLearner;

/// Logistic-regression classifier with a direct coefficient vector.
pub struct LogisticClassifier {
    model: Option<FittedLogisticRegression<f64, bool>>,
    alpha: f64,
    max_iterations: u64,
    n_features: usize,
}

impl LogisticClassifier {
    pub fn new(config: LearnerConfig) -> Result<Self, DecodeError> {
        let LearnerKind::Logistic { alpha } = config.learner_type else {
            return Err(DecodeError::InvalidParameter(
                "LogisticClassifier requires LearnerKind::Logistic".to_string(),
            ));
        };
        if alpha < 0.0 {
            return Err(DecodeError::InvalidParameter(format!(
                "alpha must be non-negative, got {}",
                alpha
            )));
        }

        Ok(LogisticClassifier {
            model: None,
            alpha,
            max_iterations: config.max_iterations,
            n_features: 0,
        })
    }

    fn check_features(&self, x: &Array2<f32>) -> Result<(), DecodeError> {
        if x.ncols() != self.n_features {
            return Err(DecodeError::ShapeMismatch {
                expected: format!("{} feature columns", self.n_features),
                found: format!("{} columns", x.ncols()),
            });
        }
        Ok(())
    }
}

impl TabularLearner for LogisticClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), DecodeError> {
        if x.nrows() != y.len() {
            return Err(DecodeError::LengthMismatch {
                samples: x.nrows(),
                labels: y.len(),
            });
        }

        self.n_features = x.ncols();
        let x_f64 = x.mapv(|v| v as f64);
        // Convert y to [true, false] for binary classification
        let targets = Array1::from_iter(y.iter().map(|&l| l == 1));
        let dataset = Dataset::new(x_f64, targets);

        let model = LogisticRegression::default()
            .alpha(self.alpha)
            .max_iterations(self.max_iterations)
            .fit(&dataset)
            .map_err(|e| DecodeError::Fit {
                model: self.name(),
                message: e.to_string(),
            })?;

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, DecodeError> {
        let model = self
            .model
            .as_ref()
            .ok_or(DecodeError::NotFitted(self.name()))?;
        self.check_features(x)?;

        let preds: Array1<bool> = model.predict(&x.mapv(|v| v as f64));
        Ok(preds.iter().map(|&p| if p { 1 } else { -1 }).collect())
    }

    fn decision_function(&self, x: &Array2<f32>) -> Result<Vec<f32>, DecodeError> {
        let model = self
            .model
            .as_ref()
            .ok_or(DecodeError::NotFitted(self.name()))?;
        self.check_features(x)?;

        let x_f64 = x.mapv(|v| v as f64);
        let margins = x_f64.dot(model.params()) + model.intercept();
        Ok(margins.iter().map(|&v| v as f32).collect())
    }

    fn coefficients(&self) -> Option<Array1<f32>> {
        self.model
            .as_ref()
            .map(|m| m.params().mapv(|v| v as f32))
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("alpha".to_string(), self.alpha.to_string()),
            (
                "max_iterations".to_string(),
                self.max_iterations.to_string(),
            ),
        ])
    }

    fn name(&self) -> &'static str {
        "LogisticClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_classifier_learns_the_split() {
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                2.0, 0.1, -2.1, 0.0, 1.9, 0.2, -1.8, 0.1, 2.2, 0.0, -2.0, 0.2, 1.8, 0.1, -2.2,
                0.0,
            ],
        )
        .unwrap();
        let y = vec![1, -1, 1, -1, 1, -1, 1, -1];

        let mut clf =
            LogisticClassifier::new(LearnerConfig::new(500, LearnerKind::Logistic { alpha: 0.1 }))
                .unwrap();
        clf.fit(&x, &y).unwrap();

        assert_eq!(clf.predict(&x).unwrap(), y);
        let coef = clf.coefficients().unwrap();
        assert_eq!(coef.len(), 2);
        assert!(coef[0] > 0.0);

        // decision values agree in sign with the hard predictions
        let scores = clf.decision_function(&x).unwrap();
        for (s, &label) in scores.iter().zip(y.iter()) {
            assert_eq!(if *s >= 0.0 { 1 } else { -1 }, label);
        }
    }

    #[test]
    fn test_negative_alpha_is_rejected() {
        let config = LearnerConfig::new(500, LearnerKind::Logistic { alpha: -1.0 });
        assert!(matches!(
            LogisticClassifier::new(config),
            Err(DecodeError::InvalidParameter(_))
        ));
    }
}
