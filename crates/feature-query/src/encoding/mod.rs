//! Response decoding.
//!
//! Attribute queries come back as GeoJSON, spatial queries as Esri JSON.
//! Both decode through [`ResponseParser`] into the same record shape.

mod esri_json;
mod geojson;

pub use esri_json::EsriJsonParser;
pub use geojson::GeoJsonParser;

use thiserror::Error;

use crate::record::FeatureRecord;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Decodes a feature service response body into records.
pub trait ResponseParser: Send + Sync {
    /// Records in service order, restricted to `out_fields`.
    fn parse(&self, body: &[u8], out_fields: &[String]) -> Result<Vec<FeatureRecord>, ParseError>;
}

/// Wire encoding of a query response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEncoding {
    GeoJson,
    EsriJson,
}

static GEOJSON: GeoJsonParser = GeoJsonParser;
static ESRI_JSON: EsriJsonParser = EsriJsonParser;

impl ResponseEncoding {
    /// Value of the `f` request parameter.
    pub fn format_param(&self) -> &'static str {
        match self {
            ResponseEncoding::GeoJson => "geojson",
            ResponseEncoding::EsriJson => "json",
        }
    }

    pub fn parser(&self) -> &'static dyn ResponseParser {
        match self {
            ResponseEncoding::GeoJson => &GEOJSON,
            ResponseEncoding::EsriJson => &ESRI_JSON,
        }
    }
}
