//! Masked decoder: drives a tabular learner with volumetric input.
//!
//! This is nothing but a sandbox for the underlying learner, with the added
//! feature of masking input data and unmasking of coefficients. Input
//! images go through the masker's forward conversion before every fit and
//! predict; after a fit the learned coefficient vector goes through the
//! masker's inverse conversion and is kept as the coefficient map.
//!
//! The "no masker" case is the explicit identity `TableMasker`; the decoder
//! itself never branches on the masker kind. One decoder instance is not
//! meant for concurrent fit/predict calls: the learner is mutated in place
//! during fit with no internal synchronization.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::LearnerConfig;
use crate::error::DecodeError;
use crate::masker::Masker;
use crate::models::classifier_trait::TabularLearner;
use crate::models::factory;

/// Wraps a tabular learner so it can be driven with image data.
///
/// The learner is constructed exactly once, at decoder construction, and
/// reused across repeated fits; the decoder never resets it between fits.
pub struct MaskedDecoder<M: Masker> {
    learner: Box<dyn TabularLearner>,
    masker: M,
    initial_params: BTreeMap<String, String>,
    coef_map: Option<M::Map>,
}

impl<M: Masker> MaskedDecoder<M> {
    /// Build the learner described by `config` and wrap it with `masker`.
    /// Construction failures of the learner propagate unchanged.
    pub fn new(config: LearnerConfig, masker: M) -> Result<Self, DecodeError> {
        Ok(Self::from_learner(factory::build_learner(&config)?, masker))
    }

    /// Wrap an already-built learner. The learner is owned exclusively by
    /// the decoder from here on.
    pub fn from_learner(learner: Box<dyn TabularLearner>, masker: M) -> Self {
        let initial_params = learner.params();
        MaskedDecoder {
            learner,
            masker,
            initial_params,
            coef_map: None,
        }
    }

    /// A learner construction parameter as snapshotted at decoder
    /// construction. Later changes inside the learner are not reflected.
    pub fn initial_param(&self, name: &str) -> Option<&str> {
        self.initial_params.get(name).map(String::as_str)
    }

    /// Params of the underlying learner, with the masker and -- once
    /// fitted -- the coefficient map of the wrapper added.
    pub fn get_params(&self) -> BTreeMap<String, String> {
        let mut params = self.learner.params();
        params.insert("masker".to_string(), self.masker.describe());
        if let Some(map) = &self.coef_map {
            params.insert("coef_map".to_string(), self.masker.describe_map(map));
        }
        params
    }

    /// Mask input data, then fit the underlying learner and unmask its
    /// coefficient vector. Returns the fitted learner, not the decoder.
    pub fn fit(
        &mut self,
        images: &M::Image,
        labels: &[i32],
    ) -> Result<&dyn TabularLearner, DecodeError> {
        let features = self.masker.forward(images)?;
        log::debug!(
            "Fitting {} on {} samples x {} features",
            self.learner.name(),
            features.nrows(),
            features.ncols()
        );
        self.learner.fit(&features, labels)?;

        let coef = self
            .learner
            .coefficients()
            .ok_or(DecodeError::MissingCoefficients(self.learner.name()))?;
        self.coef_map = Some(self.masker.inverse(&coef)?);
        Ok(self.learner.as_ref())
    }

    /// Mask input data, then predict with the underlying learner. The raw
    /// predictions are returned unchanged; only coefficients are ever
    /// inverse-transformed.
    pub fn predict(&self, images: &M::Image) -> Result<Vec<i32>, DecodeError> {
        let features = self.masker.forward(images)?;
        self.learner.predict(&features)
    }

    /// Masked decision values, for score plots.
    pub fn decision_function(&self, images: &M::Image) -> Result<Vec<f32>, DecodeError> {
        let features = self.masker.forward(images)?;
        self.learner.decision_function(&features)
    }

    /// The unmasked coefficient map of the most recent successful fit.
    pub fn coef_map(&self) -> Option<&M::Map> {
        self.coef_map.as_ref()
    }

    pub fn masker(&self) -> &M {
        &self.masker
    }

    pub fn learner(&self) -> &dyn TabularLearner {
        self.learner.as_ref()
    }
}

impl<M: Masker> fmt::Display for MaskedDecoder<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = self
            .get_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Wrapped{}({})", self.learner.name(), params)
    }
}
