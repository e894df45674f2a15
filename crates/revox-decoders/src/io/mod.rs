//! IO utilities for loading external label tables.

pub mod session_targets;

pub use session_targets::{
    read_session_targets, read_session_targets_with_config, SessionTargets, TargetReaderConfig,
};
