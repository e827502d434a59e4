//! Capability descriptor to shared tile grid.
//!
//! Resolution is all-or-nothing: every required field is validated before
//! the CRS registry is touched, so a malformed document leaves neither a
//! partial grid nor a stray CRS registration behind.

use std::sync::Arc;

use map_common::crs::EPSG_4326;
use map_common::{BoundingBox, CrsId, Point, TileSize, Units};
use metrics::counter;
use projection::{CrsRegistry, Projection};
use tracing::{debug, info, warn};

use crate::capabilities::CapabilityDescriptor;
use crate::error::{Result, TileGridError};
use crate::grid::{GridLayout, TileGridDescriptor};
use crate::layer::RasterLayerSource;
use crate::url::{AddressScheme, MirrorPolicy, TileUrlFunction};

/// Everything a host needs to configure raster layers for one map service.
#[derive(Debug, Clone)]
pub struct ResolvedTileGrid {
    /// Shared by every layer built from this resolution.
    pub grid: Arc<TileGridDescriptor>,
    /// Address rewriting applied by every layer's URL function.
    pub scheme: AddressScheme,
    pub units: Units,
    /// Copyright text, shown as layer attribution.
    pub attribution: Option<String>,
    pub full_extent: Option<BoundingBox>,
}

impl ResolvedTileGrid {
    /// URL function for a layer served from `base_urls` (mirrors).
    pub fn url_function(
        &self,
        base_urls: &[String],
        policy: MirrorPolicy,
    ) -> Result<TileUrlFunction> {
        TileUrlFunction::new(base_urls, self.scheme, policy)
    }

    /// Layer source that shares this grid.
    pub fn layer_source(
        &self,
        name: impl Into<String>,
        base_urls: &[String],
        policy: MirrorPolicy,
    ) -> Result<RasterLayerSource> {
        Ok(RasterLayerSource {
            name: name.into(),
            grid: Arc::clone(&self.grid),
            urls: self.url_function(base_urls, policy)?,
            attribution: self.attribution.clone(),
        })
    }
}

/// Validated view of the fields resolution needs.
struct RequiredFields {
    resolutions: Vec<f64>,
    crs: CrsId,
    latest_crs: Option<CrsId>,
    tile_size: TileSize,
    origin: Point,
}

fn required_fields(caps: &CapabilityDescriptor) -> Result<RequiredFields> {
    let tile_info = caps
        .tile_info
        .as_ref()
        .ok_or_else(|| TileGridError::missing("tileInfo"))?;

    let lods = tile_info
        .lods
        .as_ref()
        .ok_or_else(|| TileGridError::missing("tileInfo.lods"))?;
    if lods.is_empty() {
        return Err(TileGridError::invalid("tileInfo.lods", "is empty"));
    }

    // Service order is kept as-is: level 0 is whatever the service lists first.
    let resolutions = lods
        .iter()
        .enumerate()
        .map(|(i, lod)| match lod.resolution {
            Some(r) if r.is_finite() && r > 0.0 => Ok(r),
            Some(r) => Err(TileGridError::invalid(
                format!("tileInfo.lods[{}].resolution", i),
                format!("must be a positive number, got {}", r),
            )),
            None => Err(TileGridError::missing(format!("tileInfo.lods[{}].resolution", i))),
        })
        .collect::<Result<Vec<f64>>>()?;

    let spatial_reference = caps
        .spatial_reference
        .as_ref()
        .ok_or_else(|| TileGridError::missing("spatialReference"))?;
    let crs = spatial_reference
        .crs_id()
        .ok_or_else(|| TileGridError::missing("spatialReference.wkid"))?;

    let width = tile_info
        .tile_width()
        .ok_or_else(|| TileGridError::missing("tileInfo.width"))?;
    let height = tile_info
        .tile_height()
        .ok_or_else(|| TileGridError::missing("tileInfo.height"))?;
    if width == 0 || height == 0 {
        return Err(TileGridError::invalid(
            "tileInfo.width",
            format!("tile size must be non-zero, got {}x{}", width, height),
        ));
    }

    let origin = tile_info
        .origin
        .as_ref()
        .and_then(|o| o.point())
        .ok_or_else(|| TileGridError::missing("tileInfo.origin"))?;

    Ok(RequiredFields {
        resolutions,
        crs,
        latest_crs: spatial_reference.latest_crs_id(),
        tile_size: TileSize::new(width, height),
        origin,
    })
}

/// Make sure `crs` is known to the registry.
///
/// An unknown wkid whose `latestWkid` is known becomes an alias of it;
/// otherwise a best-effort definition is registered from the unit system.
fn ensure_crs(
    registry: &mut CrsRegistry,
    crs: &CrsId,
    latest: Option<&CrsId>,
    units: Units,
) -> Result<()> {
    if registry.contains(crs) {
        return Ok(());
    }

    if let Some(latest) = latest.filter(|l| registry.contains(l)) {
        debug!(crs = %crs, latest = %latest, "Aliasing service CRS to its latest wkid");
        registry.alias(crs.clone(), latest.clone())?;
        return Ok(());
    }

    warn!(
        crs = %crs,
        units = ?units,
        "Service CRS not registered; adding a best-effort definition without transforms"
    );
    registry.define(crs.clone(), Projection::from_units(units))?;
    Ok(())
}

/// Derive the shared tile grid for one capability document.
///
/// Geographic services (canonical `EPSG:4326`) get a global layout and the
/// offset address scheme; projected services get an explicit grid whose
/// extent spans one level-0 tile from the origin.
pub fn resolve_tile_grid(
    registry: &mut CrsRegistry,
    caps: &CapabilityDescriptor,
) -> Result<ResolvedTileGrid> {
    let fields = required_fields(caps)?;
    let units = caps.unit_system();

    ensure_crs(registry, &fields.crs, fields.latest_crs.as_ref(), units)?;

    let geographic = registry
        .canonical(&fields.crs)
        .map(|c| *c == CrsId::new(EPSG_4326))
        .unwrap_or(false);

    let (layout, scheme) = if geographic {
        (GridLayout::Global, AddressScheme::GeographicOffset)
    } else {
        let width = fields.tile_size.width as f64 * fields.resolutions[0];
        let height = fields.tile_size.height as f64 * fields.resolutions[0];
        let origin = fields.origin;
        let extent = BoundingBox::new(origin.x, origin.y - height, origin.x + width, origin.y);
        (GridLayout::Explicit { origin, extent }, AddressScheme::Standard)
    };

    let grid = TileGridDescriptor {
        crs: fields.crs,
        resolutions: fields.resolutions,
        tile_size: fields.tile_size,
        layout,
    };

    counter!("tile_grid_resolutions_total").increment(1);
    info!(
        crs = %grid.crs,
        zoom_levels = grid.zoom_levels(),
        scheme = ?scheme,
        "Resolved tile grid"
    );

    Ok(ResolvedTileGrid {
        grid: Arc::new(grid),
        scheme,
        units,
        attribution: caps.copyright_text.clone(),
        full_extent: caps.full_extent.as_ref().and_then(|e| e.bounding_box()),
    })
}
