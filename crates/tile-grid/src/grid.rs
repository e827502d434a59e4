//! Tile grid shared by every raster layer of one map.

use map_common::{BoundingBox, CrsId, Point, TileSize};
use serde::Serialize;

/// How tiles are positioned in map space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridLayout {
    /// Projected CRS: tiles counted right/down from `origin`, covering `extent`.
    Explicit { origin: Point, extent: BoundingBox },
    /// Geographic CRS: no grid geometry is computed; tiles are addressed
    /// through the global scheme of the host library.
    Global,
}

/// Resolutions, tile size and placement derived from one capability document.
///
/// Built once per capability fetch and shared (behind an `Arc`) by all
/// layers stacked in a map; tile addresses of layers built from different
/// descriptors do not line up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGridDescriptor {
    pub crs: CrsId,
    /// Map units per pixel, one per zoom level, in service order.
    pub resolutions: Vec<f64>,
    pub tile_size: TileSize,
    pub layout: GridLayout,
}

impl TileGridDescriptor {
    pub fn zoom_levels(&self) -> usize {
        self.resolutions.len()
    }

    pub fn resolution(&self, z: u32) -> Option<f64> {
        self.resolutions.get(z as usize).copied()
    }

    pub fn origin(&self) -> Option<Point> {
        match &self.layout {
            GridLayout::Explicit { origin, .. } => Some(*origin),
            GridLayout::Global => None,
        }
    }

    pub fn extent(&self) -> Option<BoundingBox> {
        match &self.layout {
            GridLayout::Explicit { extent, .. } => Some(*extent),
            GridLayout::Global => None,
        }
    }

    /// Map-space footprint of tile (`col`, `row`) at zoom `z`.
    ///
    /// Only defined for explicit grids.
    pub fn tile_bbox(&self, z: u32, col: i64, row: i64) -> Option<BoundingBox> {
        let origin = self.origin()?;
        let res = self.resolution(z)?;
        let tile_span_x = res * self.tile_size.width as f64;
        let tile_span_y = res * self.tile_size.height as f64;

        let min_x = origin.x + col as f64 * tile_span_x;
        let max_y = origin.y - row as f64 * tile_span_y;

        Some(BoundingBox::new(
            min_x,
            max_y - tile_span_y,
            min_x + tile_span_x,
            max_y,
        ))
    }

    /// Column and row of the tile containing `point` at zoom `z`.
    ///
    /// Only defined for explicit grids; returns `None` left of or above the
    /// origin.
    pub fn tile_for_point(&self, z: u32, point: Point) -> Option<(i64, i64)> {
        let origin = self.origin()?;
        let res = self.resolution(z)?;
        let tile_span_x = res * self.tile_size.width as f64;
        let tile_span_y = res * self.tile_size.height as f64;

        let col = ((point.x - origin.x) / tile_span_x).floor() as i64;
        let row = ((origin.y - point.y) / tile_span_y).floor() as i64;

        if col < 0 || row < 0 {
            return None;
        }
        Some((col, row))
    }
}
