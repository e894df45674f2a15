//! revox-decoders: linear decoding of volumetric brain-imaging data.
//!
//! This crate provides maskers for converting volume stacks into flat
//! feature matrices (and model coefficients back into volumes), lightweight
//! classifier wrappers (sparse linear, logistic, optional SVM, grid search),
//! a masked decoder that drives any of them with volumetric input, and
//! session/data handling, screening and reporting helpers used by the
//! examples and higher-level tooling.
//!
//! The design favors small, testable modules with feature flags to avoid
//! requiring extra native dependencies unless explicitly enabled.
pub mod config;
pub mod data_handling;
pub mod decoder;
pub mod error;
pub mod feature_selection;
pub mod io;
pub mod masker;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod stats;
