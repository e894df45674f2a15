use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for learners in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LearnerConfig {
    /// Iteration cap handed to the backend optimizer.
    pub max_iterations: u64,

    #[serde(flatten)]
    pub learner_type: LearnerKind,
}

/// Supported learner types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum LearnerKind {
    /// Elastic-net linear classifier; `l1_ratio` 1.0 is the lasso, 0.0 ridge.
    SparseLinear {
        penalty: f64,
        l1_ratio: f64,
        /// Keep only the top percentile of features by univariate F score
        /// before fitting. 100.0 disables screening.
        screening_percentile: f64,
    },
    Logistic {
        alpha: f64,
    },
    #[cfg(feature = "svm")]
    Svm {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        gaussian_kernel_eps: f64,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
    /// Hyper-parameter search over the base learner's penalty values;
    /// the best candidate is refitted on all samples and kept as the
    /// nested estimator.
    GridSearch {
        base: Box<LearnerKind>,
        penalty_grid: Vec<f64>,
    },
}

impl Default for LearnerKind {
    fn default() -> Self {
        LearnerKind::SparseLinear {
            penalty: 0.1,
            l1_ratio: 1.0,
            screening_percentile: 100.0,
        }
    }
}

impl LearnerKind {
    /// Copy of this kind with its primary regularization value replaced.
    /// Used by the grid search to materialize candidates.
    pub fn with_penalty(&self, value: f64) -> LearnerKind {
        match self {
            LearnerKind::SparseLinear {
                l1_ratio,
                screening_percentile,
                ..
            } => LearnerKind::SparseLinear {
                penalty: value,
                l1_ratio: *l1_ratio,
                screening_percentile: *screening_percentile,
            },
            LearnerKind::Logistic { .. } => LearnerKind::Logistic { alpha: value },
            #[cfg(feature = "svm")]
            LearnerKind::Svm {
                eps,
                kernel,
                gaussian_kernel_eps,
                polynomial_kernel_constant,
                polynomial_kernel_degree,
                ..
            } => LearnerKind::Svm {
                eps: *eps,
                c: (value, value),
                kernel: kernel.clone(),
                gaussian_kernel_eps: *gaussian_kernel_eps,
                polynomial_kernel_constant: *polynomial_kernel_constant,
                polynomial_kernel_degree: *polynomial_kernel_degree,
            },
            LearnerKind::GridSearch { base, .. } => base.with_penalty(value),
        }
    }
}

impl FromStr for LearnerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sparse" | "sparse-linear" | "lasso" => Ok(LearnerKind::SparseLinear {
                penalty: 0.1,
                l1_ratio: 1.0,
                screening_percentile: 100.0,
            }),
            "ridge" => Ok(LearnerKind::SparseLinear {
                penalty: 1.0,
                l1_ratio: 0.0,
                screening_percentile: 100.0,
            }),
            "logistic" => Ok(LearnerKind::Logistic { alpha: 1.0 }),
            #[cfg(feature = "svm")]
            "svm" => Ok(LearnerKind::Svm {
                eps: 0.1,
                c: (1.0, 1.0),
                kernel: "linear".to_string(),
                gaussian_kernel_eps: 0.1,
                polynomial_kernel_constant: 1.0,
                polynomial_kernel_degree: 3.0,
            }),
            _ => Err(format!(
                "Unknown learner type: {}. To use svm, please compile with `--features svm`",
                s
            )),
        }
    }
}

impl LearnerConfig {
    pub fn new(max_iterations: u64, learner_type: LearnerKind) -> Self {
        Self {
            max_iterations,
            learner_type,
        }
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            learner_type: LearnerKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_defaults() {
        let ridge = LearnerKind::from_str("ridge").unwrap();
        assert!(matches!(
            ridge,
            LearnerKind::SparseLinear { l1_ratio, .. } if l1_ratio == 0.0
        ));
        assert!(LearnerKind::from_str("decision-forest").is_err());
    }

    #[test]
    fn test_with_penalty_reaches_the_base_kind() {
        let search = LearnerKind::GridSearch {
            base: Box::new(LearnerKind::Logistic { alpha: 1.0 }),
            penalty_grid: vec![0.1, 1.0],
        };
        assert_eq!(
            search.with_penalty(0.5),
            LearnerKind::Logistic { alpha: 0.5 }
        );
    }

    #[test]
    fn test_default_config_is_the_lasso() {
        let config = LearnerConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert!(matches!(
            config.learner_type,
            LearnerKind::SparseLinear { l1_ratio, .. } if l1_ratio == 1.0
        ));
    }
}
