use crate::config::LearnerConfig;
use crate::error::DecodeError;
use crate::models::classifier_trait::TabularLearner;

/// Build a boxed tabular learner from a `LearnerConfig`.
/// Currently this is a thin factory implemented as a single function.
/// Invalid parameters fail here and propagate unchanged to the caller.
pub fn build_learner(config: &LearnerConfig) -> Result<Box<dyn TabularLearner>, DecodeError> {
    match config.learner_type {
        crate::config::LearnerKind::SparseLinear { .. } => Ok(Box::new(
            crate::models::sparse::SparseLinearClassifier::new(config.clone())?,
        )),

        crate::config::LearnerKind::Logistic { .. } => Ok(Box::new(
            crate::models::logistic::LogisticClassifier::new(config.clone())?,
        )),

        #[cfg(feature = "svm")]
        crate::config::LearnerKind::Svm { .. } => Ok(Box::new(
            crate::models::svm::SvmClassifier::new(config.clone())?,
        )),

        crate::config::LearnerKind::GridSearch { .. } => Ok(Box::new(
            crate::models::search::GridSearchClassifier::new(config.clone())?,
        )),
    }
}
