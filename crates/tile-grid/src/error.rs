//! Error types for tile grid resolution.

use projection::ProjectionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TileGridError>;

#[derive(Debug, Error)]
pub enum TileGridError {
    /// A required capability field is absent or unusable. No grid is produced.
    #[error("malformed capabilities: {field} {reason}")]
    MalformedCapabilities { field: String, reason: String },

    /// CRS registration failed while resolving the grid.
    #[error("CRS error: {0}")]
    Crs(#[from] ProjectionError),

    /// A layer was configured without any base URL.
    #[error("no tile source URLs configured")]
    NoTileSources,

    /// Capability document could not be fetched.
    #[error("failed to fetch capabilities from {url} (status {status:?}): {message}")]
    CapabilitiesFetch {
        url: String,
        status: Option<u16>,
        message: String,
    },
}

impl TileGridError {
    pub fn missing(field: impl Into<String>) -> Self {
        TileGridError::MalformedCapabilities {
            field: field.into(),
            reason: "is missing".to_string(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TileGridError::MalformedCapabilities {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, for `MalformedCapabilities`.
    pub fn malformed_field(&self) -> Option<&str> {
        match self {
            TileGridError::MalformedCapabilities { field, .. } => Some(field),
            _ => None,
        }
    }
}
