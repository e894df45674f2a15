use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;

use crate::config::{LearnerConfig, LearnerKind};
use crate::error::DecodeError;
use crate::models::classifier_trait::TabularLearner;
use crate::models::factory;
use crate::stats::accuracy;

/// Hyper-parameter search over a base learner's penalty values.
///
/// Each candidate penalty is fitted on a deterministic training split and
/// scored on the held-out samples, in parallel. The winning candidate is
/// refitted on all samples and kept as the nested best estimator, which
/// `coefficients` consults (one level of delegation, never deeper).
pub struct GridSearchClassifier {
    base: LearnerKind,
    penalty_grid: Vec<f64>,
    max_iterations: u64,
    best: Option<Box<dyn TabularLearner>>,
    best_penalty: Option<f64>,
}

/// One in every `HOLDOUT_STRIDE` samples is held out for candidate scoring.
const HOLDOUT_STRIDE: usize = 5;

impl GridSearchClassifier {
    pub fn new(config: LearnerConfig) -> Result<Self, DecodeError> {
        let LearnerKind::GridSearch { base, penalty_grid } = config.learner_type else {
            return Err(DecodeError::InvalidParameter(
                "GridSearchClassifier requires LearnerKind::GridSearch".to_string(),
            ));
        };

        if penalty_grid.is_empty() {
            return Err(DecodeError::InvalidParameter(
                "penalty_grid must hold at least one candidate".to_string(),
            ));
        }
        if matches!(*base, LearnerKind::GridSearch { .. }) {
            return Err(DecodeError::InvalidParameter(
                "grid search cannot nest another grid search".to_string(),
            ));
        }

        Ok(GridSearchClassifier {
            base: *base,
            penalty_grid,
            max_iterations: config.max_iterations,
            best: None,
            best_penalty: None,
        })
    }

    /// The penalty of the winning candidate, once fitted.
    pub fn best_penalty(&self) -> Option<f64> {
        self.best_penalty
    }

    /// The refitted best candidate, once fitted.
    pub fn best_estimator(&self) -> Option<&dyn TabularLearner> {
        self.best.as_deref()
    }

    fn candidate_config(&self, penalty: f64) -> LearnerConfig {
        LearnerConfig::new(self.max_iterations, self.base.with_penalty(penalty))
    }
}

impl TabularLearner for GridSearchClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), DecodeError> {
        if x.nrows() != y.len() {
            return Err(DecodeError::LengthMismatch {
                samples: x.nrows(),
                labels: y.len(),
            });
        }

        let holdout: Vec<usize> = (0..x.nrows())
            .filter(|i| i % HOLDOUT_STRIDE == HOLDOUT_STRIDE - 1)
            .collect();
        let train: Vec<usize> = (0..x.nrows())
            .filter(|i| i % HOLDOUT_STRIDE != HOLDOUT_STRIDE - 1)
            .collect();

        // With too few samples for a held-out split, score on the training data.
        let (train, holdout) = if holdout.is_empty() || train.is_empty() {
            let all: Vec<usize> = (0..x.nrows()).collect();
            (all.clone(), all)
        } else {
            (train, holdout)
        };

        let x_train = x.select(Axis(0), &train);
        let y_train: Vec<i32> = train.iter().map(|&i| y[i]).collect();
        let x_val = x.select(Axis(0), &holdout);
        let y_val: Vec<i32> = holdout.iter().map(|&i| y[i]).collect();

        let candidates: Vec<(f64, LearnerConfig)> = self
            .penalty_grid
            .iter()
            .map(|&penalty| (penalty, self.candidate_config(penalty)))
            .collect();
        let scored: Vec<(f64, f32)> = candidates
            .par_iter()
            .map(|(penalty, config)| -> Result<(f64, f32), DecodeError> {
                let mut candidate = factory::build_learner(config)?;
                candidate.fit(&x_train, &y_train)?;
                let preds = candidate.predict(&x_val)?;
                Ok((*penalty, accuracy(&preds, &y_val)))
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        let mut best_penalty = scored[0].0;
        let mut best_score = scored[0].1;
        for &(penalty, score) in scored.iter().skip(1) {
            if score > best_score {
                best_score = score;
                best_penalty = penalty;
            }
        }
        log::info!(
            "Grid search over {} candidates: best penalty {} (held-out accuracy {:.3})",
            self.penalty_grid.len(),
            best_penalty,
            best_score
        );

        let mut best = factory::build_learner(&self.candidate_config(best_penalty))?;
        best.fit(x, y)?;
        self.best = Some(best);
        self.best_penalty = Some(best_penalty);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, DecodeError> {
        self.best
            .as_ref()
            .ok_or(DecodeError::NotFitted(self.name()))?
            .predict(x)
    }

    fn decision_function(&self, x: &Array2<f32>) -> Result<Vec<f32>, DecodeError> {
        self.best
            .as_ref()
            .ok_or(DecodeError::NotFitted(self.name()))?
            .decision_function(x)
    }

    fn coefficients(&self) -> Option<Array1<f32>> {
        self.best.as_ref().and_then(|best| best.coefficients())
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("base".to_string(), kind_name(&self.base).to_string()),
            (
                "penalty_grid".to_string(),
                format!("{:?}", self.penalty_grid),
            ),
            (
                "max_iterations".to_string(),
                self.max_iterations.to_string(),
            ),
        ])
    }

    fn name(&self) -> &'static str {
        "GridSearchClassifier"
    }
}

fn kind_name(kind: &LearnerKind) -> &'static str {
    match kind {
        LearnerKind::SparseLinear { .. } => "SparseLinear",
        LearnerKind::Logistic { .. } => "Logistic",
        #[cfg(feature = "svm")]
        LearnerKind::Svm { .. } => "Svm",
        LearnerKind::GridSearch { .. } => "GridSearch",
    }
}

/// Log-spaced penalty grid from `high` down to `low`, inclusive.
pub fn log_grid(high: f64, low: f64, n: usize) -> Vec<f64> {
    assert!(high > 0.0 && low > 0.0, "log grid bounds must be positive");
    assert!(n >= 2, "log grid needs at least two points");
    itertools_num::linspace(high.log10(), low.log10(), n)
        .map(|e| 10f64.powf(e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_config() -> LearnerConfig {
        LearnerConfig::new(
            1000,
            LearnerKind::GridSearch {
                base: Box::new(LearnerKind::SparseLinear {
                    penalty: 0.1,
                    l1_ratio: 1.0,
                    screening_percentile: 100.0,
                }),
                penalty_grid: vec![10.0, 0.01],
            },
        )
    }

    fn data() -> (Array2<f32>, Vec<i32>) {
        let x = Array2::from_shape_vec(
            (10, 2),
            vec![
                2.0, 0.3, -2.1, 0.1, 1.9, 0.2, -1.8, 0.4, 2.2, 0.1, -2.0, 0.3, 1.8, 0.2, -2.2,
                0.1, 2.1, 0.4, -1.9, 0.2,
            ],
        )
        .unwrap();
        let y = vec![1, -1, 1, -1, 1, -1, 1, -1, 1, -1];
        (x, y)
    }

    #[test]
    fn test_grid_search_picks_the_weaker_penalty() {
        let (x, y) = data();
        let mut search = GridSearchClassifier::new(search_config()).unwrap();
        search.fit(&x, &y).unwrap();

        // penalty 10.0 shrinks everything to zero on this data
        assert_eq!(search.best_penalty(), Some(0.01));
        assert_eq!(search.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_coefficients_come_from_the_nested_estimator() {
        let (x, y) = data();
        let mut search = GridSearchClassifier::new(search_config()).unwrap();
        assert!(search.coefficients().is_none());
        search.fit(&x, &y).unwrap();

        let coef = search.coefficients().unwrap();
        assert_eq!(coef.len(), 2);
        let nested = search.best_estimator().unwrap().coefficients().unwrap();
        assert_eq!(coef, nested);
    }

    #[test]
    fn test_nested_grid_search_is_rejected() {
        let config = LearnerConfig::new(
            100,
            LearnerKind::GridSearch {
                base: Box::new(LearnerKind::GridSearch {
                    base: Box::new(LearnerKind::Logistic { alpha: 1.0 }),
                    penalty_grid: vec![1.0, 2.0],
                }),
                penalty_grid: vec![1.0],
            },
        );
        assert!(matches!(
            GridSearchClassifier::new(config),
            Err(DecodeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_log_grid_is_decreasing() {
        let grid = log_grid(100.0, 0.01, 5);
        assert_eq!(grid.len(), 5);
        assert!((grid[0] - 100.0).abs() < 1e-9);
        assert!((grid[4] - 0.01).abs() < 1e-9);
        assert!(grid.windows(2).all(|w| w[0] > w[1]));
    }
}
