pub mod logistic;
pub mod search;
pub mod sparse;
#[cfg(feature = "svm")]
pub mod svm;

pub mod classifier_trait;
pub mod factory;
