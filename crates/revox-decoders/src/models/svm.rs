use std::collections::BTreeMap;

use linfa::dataset::Pr;
use linfa::traits::Predict;
use linfa::Dataset;
use linfa_svm::Svm;
use linfa_svm::SvmParams;
use ndarray::{Array1, Array2};

use crate::config::{LearnerConfig, LearnerKind};
use crate::error::DecodeError;
use crate::models::classifier_trait::TabularLearner;

/// Support-vector classifier.
///
/// Kernel machines keep no primal hyperplane here, so this learner exposes
/// no coefficient vector; wrapping it in a masked decoder fails the
/// coefficient contract.
pub struct SvmClassifier {
    model: Option<Svm<f64, Pr>>,
    eps: f64,
    c: (f64, f64),
    kernel: String,
    gaussian_kernel_eps: f64,
    polynomial_kernel_constant: f64,
    polynomial_kernel_degree: f64,
    n_features: usize,
}

impl SvmClassifier {
    pub fn new(config: LearnerConfig) -> Result<Self, DecodeError> {
        let LearnerKind::Svm {
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
        } = config.learner_type
        else {
            return Err(DecodeError::InvalidParameter(
                "SvmClassifier requires LearnerKind::Svm".to_string(),
            ));
        };

        if !matches!(kernel.as_str(), "linear" | "gauss" | "poly") {
            return Err(DecodeError::InvalidParameter(format!(
                "Unsupported kernel type: {}. Valid options are: linear, gauss, poly",
                kernel
            )));
        }

        Ok(SvmClassifier {
            model: None,
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
            n_features: 0,
        })
    }
}

impl TabularLearner for SvmClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), DecodeError> {
        if x.nrows() != y.len() {
            return Err(DecodeError::LengthMismatch {
                samples: x.nrows(),
                labels: y.len(),
            });
        }

        self.n_features = x.ncols();
        // Convert y to [true, false] for binary classification
        let targets = Array1::from_iter(y.iter().map(|&l| l == 1));
        let x_f64 = x.mapv(|v| v as f64);
        let dataset = Dataset::new(x_f64, targets);

        let mut params: SvmParams<f64, Pr> = Svm::<f64, Pr>::params()
            .eps(self.eps)
            .pos_neg_weights(self.c.0, self.c.1);

        params = match self.kernel.as_str() {
            "linear" => params.linear_kernel(),
            "gauss" => params.gaussian_kernel(self.gaussian_kernel_eps),
            "poly" => params.polynomial_kernel(
                self.polynomial_kernel_constant,
                self.polynomial_kernel_degree,
            ),
            // rejected at construction
            other => {
                return Err(DecodeError::InvalidParameter(format!(
                    "Unsupported kernel type: {}",
                    other
                )))
            }
        };

        let model = <SvmParams<f64, Pr> as linfa::traits::Fit<_, _, _>>::fit(&params, &dataset)
            .map_err(|e| DecodeError::Fit {
                model: self.name(),
                message: e.to_string(),
            })?;

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

        let x_f64 = x.mapv(|v| v as f64);
        let probabilities: Array1<Pr> = model.predict(&x_f64);
        // Center probabilities so the sign convention matches the linear models
        Ok(probabilities.iter().map(|&p| *p - 0.5).collect())
    }

    fn coefficients(&self) -> Option<Array1<f32>> {
        None
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("eps".to_string(), self.eps.to_string()),
            ("c_pos".to_string(), self.c.0.to_string()),
            ("c_neg".to_string(), self.c.1.to_string()),
            ("kernel".to_string(), self.kernel.clone()),
            (
                "gaussian_kernel_eps".to_string(),
                self.gaussian_kernel_eps.to_string(),
            ),
            (
                "polynomial_kernel_constant".to_string(),
                self.polynomial_kernel_constant.to_string(),
            ),
            (
                "polynomial_kernel_degree".to_string(),
                self.polynomial_kernel_degree.to_string(),
            ),
        ])
    }

    fn name(&self) -> &'static str {
        "SvmClassifier"
    }
}
