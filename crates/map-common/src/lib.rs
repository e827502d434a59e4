//! Common types and utilities shared across the basemap workspace.

pub mod bbox;
pub mod crs;
pub mod esri;
pub mod http;
pub mod point;
pub mod tile;

pub use bbox::BoundingBox;
pub use crs::{CrsId, CrsKind, Units};
pub use esri::{ServiceErrorBody, ServiceErrorEnvelope, SpatialReference};
pub use http::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
pub use point::Point;
pub use tile::{TileAddress, TileSize};
