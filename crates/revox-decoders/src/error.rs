use std::error::Error;
use std::fmt;

/// Custom error type for decoding failures
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Input data does not match the shape an operation was configured for.
    ShapeMismatch { expected: String, found: String },
    /// Sample count and label count disagree.
    LengthMismatch { samples: usize, labels: usize },
    /// A condition name was requested that no sample carries.
    UnknownCondition(String),
    /// A learner was configured with an unusable parameter value.
    InvalidParameter(String),
    /// The wrapped learner exposes no coefficient vector after fitting.
    MissingCoefficients(&'static str),
    /// Predict was called on a learner that has not been fitted.
    NotFitted(&'static str),
    /// The backend optimizer failed; the message is passed through as-is.
    Fit { model: &'static str, message: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {}, found {}", expected, found)
            }
            DecodeError::LengthMismatch { samples, labels } => write!(
                f,
                "Got {} samples but {} labels; counts must be equal",
                samples, labels
            ),
            DecodeError::UnknownCondition(name) => {
                write!(f, "No sample carries the condition '{}'", name)
            }
            DecodeError::InvalidParameter(message) => {
                write!(f, "Invalid parameter: {}", message)
            }
            DecodeError::MissingCoefficients(model) => write!(
                f,
                "{} exposes no coefficient vector; a masked decoder requires one",
                model
            ),
            DecodeError::NotFitted(model) => {
                write!(f, "{} must be fitted before calling predict", model)
            }
            DecodeError::Fit { model, message } => {
                write!(f, "{} fit failed: {}", model, message)
            }
        }
    }
}

impl Error for DecodeError {}
