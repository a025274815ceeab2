//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeonodeTypesError {
    /// Text could not be parsed as a geometry.
    #[error("failed to parse WKT: {0}")]
    Parse(String),
    /// Geometry structure violates the model (unclosed ring, too few points, etc).
    #[error("invalid geometry structure: {0}")]
    InvalidStructure(String),
    /// Projection definition is malformed or names an unsupported value.
    #[error("invalid projection definition: {0}")]
    InvalidProjection(String),
    /// Projection definition lacks a parameter required by its family.
    #[error("missing projection parameter: {0}")]
    MissingArgument(String),
}
