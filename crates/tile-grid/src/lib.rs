//! Tile grid resolution for ArcGIS REST tiled map services.
//!
//! A capability document is turned into a single [`TileGridDescriptor`]
//! that every raster layer of a map shares, plus a URL function per layer
//! mapping host tile addresses to tile fetch URLs.

pub mod capabilities;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod layer;
pub mod resolver;
pub mod url;

pub use capabilities::{CapabilityDescriptor, Extent, Lod, Origin, TileInfo};
pub use error::{Result, TileGridError};
pub use fetch::fetch_capabilities;
pub use grid::{GridLayout, TileGridDescriptor};
pub use layer::RasterLayerSource;
pub use resolver::{resolve_tile_grid, ResolvedTileGrid};
pub use url::{AddressScheme, MirrorPolicy, TileUrlFunction, TILE_PATH_SUFFIX};
