//! Basemap layer stack built on one resolved tile grid.

use anyhow::{Context, Result};
use map_common::TileAddress;
use tile_grid::{MirrorPolicy, RasterLayerSource, ResolvedTileGrid};
use tracing::{debug, info};

use crate::config::MapServiceConfig;
use crate::sketch::SketchOverlay;

/// One raster layer in the stack.
#[derive(Debug, Clone)]
pub struct RasterLayer {
    pub source: RasterLayerSource,
    pub visible: bool,
}

/// Raster layers bottom to top, with the sketch overlay above them.
#[derive(Debug)]
pub struct BasemapStack {
    pub layers: Vec<RasterLayer>,
    pub overlay: SketchOverlay,
    /// Configured services left out of the stack.
    pub unstacked: Vec<String>,
}

impl BasemapStack {
    /// Build a layer for every stacked service, all sharing `resolved.grid`.
    pub fn build(
        resolved: &ResolvedTileGrid,
        services: &[MapServiceConfig],
        policy: MirrorPolicy,
    ) -> Result<Self> {
        let mut layers = Vec::new();
        let mut unstacked = Vec::new();

        for service in services {
            if !service.stacked {
                debug!(layer = %service.name, "Service configured but not stacked");
                unstacked.push(service.name.clone());
                continue;
            }

            let source = resolved
                .layer_source(service.name.clone(), &service.base_urls(), policy)
                .with_context(|| format!("Failed to configure layer {}", service.name))?;
            layers.push(RasterLayer {
                source,
                visible: service.visible,
            });
        }

        info!(
            layers = layers.len(),
            unstacked = unstacked.len(),
            crs = %resolved.grid.crs,
            "Built basemap stack"
        );

        Ok(Self {
            layers,
            overlay: SketchOverlay::default(),
            unstacked,
        })
    }

    /// Layer names, bottom first.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.source.name.as_str()).collect()
    }

    /// Fetch URLs of one tile address for every visible layer, bottom first.
    pub fn tile_urls(&self, address: TileAddress) -> Vec<(&str, String)> {
        self.layers
            .iter()
            .filter(|l| l.visible && l.source.covers_zoom(address))
            .map(|l| (l.source.name.as_str(), l.source.tile_url(address)))
            .collect()
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.source.name == name) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }
}
