//! Raster layer sources built on a resolved grid.

use std::sync::Arc;

use map_common::TileAddress;

use crate::grid::TileGridDescriptor;
use crate::url::TileUrlFunction;

/// One tiled raster layer: a name, the grid it is addressed in and where
/// its tiles come from.
#[derive(Debug, Clone)]
pub struct RasterLayerSource {
    pub name: String,
    pub grid: Arc<TileGridDescriptor>,
    pub urls: TileUrlFunction,
    pub attribution: Option<String>,
}

impl RasterLayerSource {
    pub fn tile_url(&self, address: TileAddress) -> String {
        self.urls.url(address)
    }

    /// True when both layers were built from the same resolved grid.
    ///
    /// Layers stacked in one map must share a grid for their tiles to line up.
    pub fn shares_grid_with(&self, other: &RasterLayerSource) -> bool {
        Arc::ptr_eq(&self.grid, &other.grid)
    }

    /// Whether `address` names a zoom level this grid defines.
    pub fn covers_zoom(&self, address: TileAddress) -> bool {
        (address.z as usize) < self.grid.zoom_levels()
    }
}
