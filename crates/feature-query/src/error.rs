//! Error types for feature queries.

use map_common::CrsId;
use thiserror::Error;

pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Transport failure, non-2xx status, service error envelope or an
    /// undecodable body. `status` is `None` when no response was received.
    #[error("query to {url} failed (status {status:?}): {message}")]
    QueryFailed {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The query geometry could not be expressed in the service's CRS.
    /// Raised before any request is sent.
    #[error("cannot query {service_crs} service with {geometry_crs} geometry: {reason}")]
    CrsMismatch {
        geometry_crs: CrsId,
        service_crs: CrsId,
        reason: String,
    },

    #[error("invalid query geometry: {0}")]
    InvalidGeometry(String),
}

impl QueryError {
    pub fn failed(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        QueryError::QueryFailed {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Short label used as the `reason` of the failure counter.
    pub fn reason(&self) -> &'static str {
        match self {
            QueryError::QueryFailed { status: None, .. } => "transport",
            QueryError::QueryFailed { .. } => "service",
            QueryError::CrsMismatch { .. } => "crs_mismatch",
            QueryError::InvalidGeometry(_) => "invalid_geometry",
        }
    }
}
