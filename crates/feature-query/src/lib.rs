//! Attribute and spatial queries against ArcGIS REST feature services.
//!
//! Responses arrive as GeoJSON (attribute queries) or Esri JSON (spatial
//! queries) and are normalized into [`FeatureRecord`]s. Spatial filters are
//! reprojected into the service's native CRS through the CRS registry
//! before anything is sent.

pub mod encoding;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod record;

pub use encoding::{EsriJsonParser, GeoJsonParser, ParseError, ResponseEncoding, ResponseParser};
pub use engine::{FeatureQueryEngine, FeatureService, ServiceDescription, SPATIAL_REL_INTERSECTS};
pub use error::{QueryError, QueryResult};
pub use geometry::{FeatureGeometry, QueryGeometry};
pub use record::{FeatureRecord, FieldValue, ALL_FIELDS};
