use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use crate::error::DecodeError;

/// Contract every tabular learner in the crate satisfies. This mirrors the
/// fit/predict surface the masked decoder drives, and centralizes the
/// contract in the `models` module so implementations can live next to
/// model code.
///
/// Labels use the crate convention: 1 for the positive condition, -1 for
/// the negative condition.
pub trait TabularLearner: Send {
    /// Fit the learner on a (samples x features) matrix.
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), DecodeError>;

    /// Predict hard labels (1 / -1), one per row of `x`.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, DecodeError>;

    /// Raw decision values (sign gives the predicted label for linear models).
    fn decision_function(&self, x: &Array2<f32>) -> Result<Vec<f32>, DecodeError>;

    /// The learned feature-space coefficient vector, when the learner has
    /// one. Learners wrapping a nested best estimator delegate exactly one
    /// level; kernel models without a primal hyperplane return `None`.
    fn coefficients(&self) -> Option<Array1<f32>>;

    /// Current construction parameters, keyed by name.
    fn params(&self) -> BTreeMap<String, String>;

    /// Human readable name for the learner
    fn name(&self) -> &'static str {
        "classifier"
    }
}
