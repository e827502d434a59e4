//! Map service capability document (`<MapServer>?f=json`).
//!
//! Every field is optional on the wire; presence is checked by the
//! resolver so that a missing field is reported by name instead of as an
//! opaque deserialization error.

use map_common::{BoundingBox, Point, SpatialReference, Units};
use serde::{Deserialize, Serialize};

/// Self-description of a tiled map service, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapabilityDescriptor {
    pub tile_info: Option<TileInfo>,
    pub spatial_reference: Option<SpatialReference>,
    /// Esri unit name, e.g. `esriMeters` or `esriDecimalDegrees`
    pub units: Option<String>,
    pub full_extent: Option<Extent>,
    pub copyright_text: Option<String>,
}

/// `tileInfo` block. Tile size appears as `width`/`height` or `cols`/`rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub cols: Option<u32>,
    pub rows: Option<u32>,
    pub origin: Option<Origin>,
    pub lods: Option<Vec<Lod>>,
}

impl TileInfo {
    pub fn tile_width(&self) -> Option<u32> {
        self.width.or(self.cols)
    }

    pub fn tile_height(&self) -> Option<u32> {
        self.height.or(self.rows)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Origin {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl Origin {
    pub fn point(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

/// One level of detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lod {
    pub level: Option<u32>,
    /// Map units per pixel
    pub resolution: Option<f64>,
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extent {
    pub xmin: Option<f64>,
    pub ymin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymax: Option<f64>,
}

impl Extent {
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::new(self.xmin?, self.ymin?, self.xmax?, self.ymax?))
    }
}

impl CapabilityDescriptor {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Unit system; anything other than `esriMeters` counts as degrees.
    pub fn unit_system(&self) -> Units {
        Units::from_esri(self.units.as_deref())
    }
}
