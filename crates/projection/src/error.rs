//! Error types for the CRS registry.

use map_common::CrsId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Identifier is neither defined nor an alias.
    #[error("unknown CRS: {0}")]
    UnknownCrs(CrsId),

    /// Identifier already registered with different parameters.
    #[error("CRS {0} is already defined with different parameters")]
    ConflictingDefinition(CrsId),

    /// Both CRSs are known but at least one has no transform math.
    #[error("no transform available from {from} to {to}")]
    NoTransform { from: CrsId, to: CrsId },

    /// The transform produced a non-finite coordinate.
    #[error("point ({x}, {y}) cannot be represented in {crs}")]
    OutOfDomain { crs: CrsId, x: f64, y: f64 },
}
