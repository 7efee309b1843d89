//! Shape construction errors

use pbr_core::pbrt::Float;
use thiserror::Error;

/// Errors raised while building shapes from a scene description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// No shape is registered under the name.
    #[error("shape '{0}' unknown")]
    UnknownShape(String),

    /// A parameter value the shape cannot be built with.
    #[error("invalid value {value} for parameter '{name}' of shape '{shape}'")]
    InvalidParameter {
        shape: String,
        name: String,
        value: Float,
    },
}

/// Result type for shape construction.
pub type Result<T> = std::result::Result<T, ShapeError>;
