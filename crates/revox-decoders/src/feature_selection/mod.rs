//! Feature selection utilities.
//!
//! This module contains univariate selection routines (a la scikit-learn)
//! for scoring and ranking features based on F-statistics.
pub mod univariate_selection;
