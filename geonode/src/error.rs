//! Error types used by the crate.

use geonode_types::error::GeonodeTypesError;
use thiserror::Error;

/// Geonode error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeonodeError {
    /// Text could not be parsed as a geometry.
    #[error("failed to parse geometry: {0}")]
    Parse(String),
    /// Operation was given a geometry it cannot process.
    #[error("geometry operation failed: {0}")]
    GeometryOperation(String),
    /// Reference system definition is not recognized or incomplete.
    #[error("invalid projection: {0}")]
    InvalidProjection(String),
    /// Required argument is absent.
    #[error("missing argument: {0}")]
    MissingArgument(String),
    /// Argument has a wrong value or the geometry is not initialized.
    #[error("invalid argument: {0}")]
    Argument(String),
}

impl From<GeonodeTypesError> for GeonodeError {
    fn from(value: GeonodeTypesError) -> Self {
        match value {
            GeonodeTypesError::Parse(message) => Self::Parse(message),
            GeonodeTypesError::InvalidStructure(message) => Self::GeometryOperation(message),
            GeonodeTypesError::InvalidProjection(message) => Self::InvalidProjection(message),
            GeonodeTypesError::MissingArgument(message) => Self::MissingArgument(message),
        }
    }
}
