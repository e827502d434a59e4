//! Tile grid resolution against canned capability documents.

use map_common::{
    BoundingBox, CrsId, CrsKind, Point, SpatialReference, TileAddress, TileSize, Units,
};
use projection::{CrsRegistry, Projection, ProjectionError};
use test_utils::fixtures::{capabilities, urls};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};
use tile_grid::{
    resolve_tile_grid, AddressScheme, CapabilityDescriptor, GridLayout, MirrorPolicy,
    TileGridError,
};

fn caps(json: &str) -> CapabilityDescriptor {
    CapabilityDescriptor::from_json(json.as_bytes()).unwrap()
}

fn base(url: &str) -> Vec<String> {
    vec![url.to_string()]
}

// ============================================================================
// Geographic services
// ============================================================================

#[test]
fn test_geographic_service_uses_global_layout() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved = resolve_tile_grid(&mut registry, &caps(capabilities::GEOGRAPHIC)).unwrap();

    assert_eq!(resolved.grid.crs, CrsId::new("EPSG:4326"));
    assert_eq!(resolved.grid.layout, GridLayout::Global);
    assert_eq!(resolved.grid.tile_size, TileSize::new(512, 512));
    assert_eq!(resolved.grid.resolutions, vec![0.3515625, 0.17578125, 0.087890625]);
    assert_eq!(resolved.scheme, AddressScheme::GeographicOffset);
    assert_eq!(resolved.units, Units::Degrees);
}

#[test]
fn test_geographic_address_offset() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved = resolve_tile_grid(&mut registry, &caps(capabilities::GEOGRAPHIC)).unwrap();
    let urls = resolved
        .url_function(&base("https://geo.example.com/MapServer"), MirrorPolicy::Random)
        .unwrap();

    // host (z, x, y) -> service (z - 1, x, -y - 1)
    assert_eq!(
        urls.url(TileAddress::new(1, 0, -1)),
        "https://geo.example.com/MapServer/tile/0/0/0"
    );
    assert_eq!(
        urls.url(TileAddress::new(3, 5, -2)),
        "https://geo.example.com/MapServer/tile/2/1/5"
    );
}

#[test]
fn test_crs84_service_is_geographic() {
    let mut registry = CrsRegistry::with_defaults();
    registry.alias("EPSG:4269", "CRS:84").unwrap();
    let mut doc = caps(capabilities::GEOGRAPHIC);
    doc.spatial_reference = Some(SpatialReference::from_wkid(4269));

    let resolved = resolve_tile_grid(&mut registry, &doc).unwrap();
    assert_eq!(resolved.grid.crs, CrsId::epsg(4269));
    assert_eq!(resolved.scheme, AddressScheme::GeographicOffset);
}

// ============================================================================
// Projected services
// ============================================================================

#[test]
fn test_web_mercator_extent_from_origin() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved = resolve_tile_grid(&mut registry, &caps(capabilities::WEB_MERCATOR)).unwrap();

    assert_eq!(resolved.grid.crs, CrsId::new("EPSG:102100"));
    assert_eq!(resolved.scheme, AddressScheme::Standard);
    assert_eq!(resolved.grid.zoom_levels(), 20);

    let extent = resolved.grid.extent().unwrap();
    let span = 256.0 * 156543.03392800014;
    assert_approx_eq!(extent.min_x, -20037508.342787, 1e-6);
    assert_approx_eq!(extent.max_y, 20037508.342787, 1e-6);
    assert_approx_eq!(extent.max_x, -20037508.342787 + span, 1e-6);
    assert_approx_eq!(extent.min_y, 20037508.342787 - span, 1e-6);
    // One level-0 tile covers the whole Mercator square.
    assert_approx_eq!(extent.max_x, 20037508.342787, 0.01);
    assert_approx_eq!(extent.min_y, -20037508.342787, 0.01);

    let origin = resolved.grid.origin().unwrap();
    assert_coords_approx_eq!((origin.x, origin.y), (-20037508.342787, 20037508.342787), 1e-9);
}

#[test]
fn test_projected_metadata_carried() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved = resolve_tile_grid(&mut registry, &caps(capabilities::WEB_MERCATOR)).unwrap();

    assert_eq!(
        resolved.attribution.as_deref(),
        Some("MassGIS, Commonwealth of Massachusetts EOTSS")
    );
    assert_eq!(
        resolved.full_extent,
        Some(BoundingBox::new(-8192337.0, 5041002.0, -7760880.0, 5278066.0))
    );
    assert_eq!(resolved.units, Units::Meters);
}

#[test]
fn test_projected_addresses_pass_through() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved = resolve_tile_grid(&mut registry, &caps(capabilities::WEB_MERCATOR)).unwrap();
    let urls = resolved
        .url_function(&base(urls::TOPO_FEATURES), MirrorPolicy::Random)
        .unwrap();

    assert_eq!(
        urls.url(TileAddress::new(11, 619, 757)),
        format!("{}/tile/11/757/619", urls::TOPO_FEATURES)
    );
}

#[test]
fn test_lods_keep_service_order() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved =
        resolve_tile_grid(&mut registry, &caps(capabilities::OUT_OF_ORDER_LODS)).unwrap();

    assert_eq!(resolved.grid.resolutions, vec![4.0, 16.0, 8.0]);
    // Extent is derived from the first listed resolution.
    assert_eq!(
        resolved.grid.extent(),
        Some(BoundingBox::new(0.0, 1_200_000.0 - 1024.0, 1024.0, 1_200_000.0))
    );
}

#[test]
fn test_tile_for_point_on_resolved_grid() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved = resolve_tile_grid(&mut registry, &caps(capabilities::WEB_MERCATOR)).unwrap();

    let boston = registry
        .project(Point::new(-71.0589, 42.3601), &CrsId::new("CRS:84"), &resolved.grid.crs)
        .unwrap();
    let (col, row) = resolved.grid.tile_for_point(11, boston).unwrap();
    let bbox = resolved.grid.tile_bbox(11, col, row).unwrap();
    assert!(bbox.contains_point(boston.x, boston.y));
}

// ============================================================================
// CRS registration during resolution
// ============================================================================

#[test]
fn test_esri_alias_resolves_to_web_mercator() {
    let mut registry = CrsRegistry::with_defaults();
    resolve_tile_grid(&mut registry, &caps(capabilities::WEB_MERCATOR)).unwrap();

    assert!(registry
        .same_crs(&CrsId::new("EPSG:102100"), &CrsId::new("EPSG:3857"))
        .unwrap());
}

#[test]
fn test_unknown_wkid_aliased_to_known_latest_wkid() {
    let mut registry = CrsRegistry::with_defaults();
    let mut doc = caps(capabilities::WEB_MERCATOR);
    doc.spatial_reference = Some(SpatialReference {
        wkid: Some(3785),
        latest_wkid: Some(3857),
    });
    assert!(!registry.contains(&CrsId::epsg(3785)));

    let resolved = resolve_tile_grid(&mut registry, &doc).unwrap();
    assert_eq!(resolved.grid.crs, CrsId::epsg(3785));
    assert_eq!(registry.canonical(&CrsId::epsg(3785)), Some(&CrsId::epsg(3857)));
}

#[test]
fn test_unknown_crs_registered_best_effort() {
    let mut registry = CrsRegistry::with_defaults();
    let resolved =
        resolve_tile_grid(&mut registry, &caps(capabilities::UNKNOWN_PROJECTED)).unwrap();

    let crs = CrsId::epsg(2249);
    assert_eq!(resolved.grid.crs, crs);
    assert_eq!(
        registry.get(&crs),
        Some(&Projection::Unspecified { units: Units::Meters })
    );
    assert_eq!(registry.kind(&crs).unwrap(), CrsKind::Projected);
    assert_eq!(resolved.scheme, AddressScheme::Standard);

    // Known, but not transformable.
    let err = registry
        .project(Point::new(0.0, 0.0), &crs, &CrsId::new("EPSG:3857"))
        .unwrap_err();
    assert!(matches!(err, ProjectionError::NoTransform { .. }));
}

#[test]
fn test_resolving_twice_reuses_registration() {
    let mut registry = CrsRegistry::with_defaults();
    let doc = caps(capabilities::UNKNOWN_PROJECTED);
    resolve_tile_grid(&mut registry, &doc).unwrap();
    resolve_tile_grid(&mut registry, &doc).unwrap();
    assert!(registry.contains(&CrsId::epsg(2249)));
}

// ============================================================================
// Malformed capabilities
// ============================================================================

fn malformed_field(json: &str) -> String {
    malformed_descriptor_field(&caps(json))
}

fn malformed_descriptor_field(doc: &CapabilityDescriptor) -> String {
    let mut registry = CrsRegistry::with_defaults();
    let err = resolve_tile_grid(&mut registry, doc).unwrap_err();
    assert!(
        matches!(err, TileGridError::MalformedCapabilities { .. }),
        "unexpected error: {:?}",
        err
    );
    err.malformed_field().unwrap().to_string()
}

#[test]
fn test_empty_lods_rejected() {
    assert_eq!(malformed_field(capabilities::EMPTY_LODS), "tileInfo.lods");
}

#[test]
fn test_missing_origin_rejected() {
    assert_eq!(malformed_field(capabilities::MISSING_ORIGIN), "tileInfo.origin");
}

#[test]
fn test_missing_wkid_rejected() {
    assert_eq!(malformed_field(capabilities::MISSING_WKID), "spatialReference.wkid");
}

#[test]
fn test_missing_tile_size_rejected() {
    assert_eq!(malformed_field(capabilities::MISSING_TILE_SIZE), "tileInfo.width");
}

#[test]
fn test_missing_tile_info_rejected() {
    assert_eq!(
        malformed_field(r#"{"spatialReference": {"wkid": 3857}, "units": "esriMeters"}"#),
        "tileInfo"
    );
}

#[test]
fn test_non_positive_resolution_rejected() {
    let mut doc = caps(capabilities::OUT_OF_ORDER_LODS);
    if let Some(lods) = doc.tile_info.as_mut().and_then(|t| t.lods.as_mut()) {
        lods[1].resolution = Some(0.0);
    }
    assert_eq!(malformed_descriptor_field(&doc), "tileInfo.lods[1].resolution");
}

#[test]
fn test_failed_resolution_leaves_registry_untouched() {
    let mut registry = CrsRegistry::with_defaults();
    let mut doc = caps(capabilities::UNKNOWN_PROJECTED);
    if let Some(info) = doc.tile_info.as_mut() {
        info.lods = Some(Vec::new());
    }

    let err = resolve_tile_grid(&mut registry, &doc).unwrap_err();
    assert_eq!(err.malformed_field(), Some("tileInfo.lods"));
    assert!(!registry.contains(&CrsId::epsg(2249)));
}

#[test]
fn test_known_wkid_ignores_latest_wkid() {
    let mut registry = CrsRegistry::with_defaults();
    let mut doc = caps(capabilities::WEB_MERCATOR);
    doc.spatial_reference = Some(SpatialReference {
        wkid: Some(102100),
        latest_wkid: Some(4326),
    });

    let resolved = resolve_tile_grid(&mut registry, &doc).unwrap();
    assert_eq!(resolved.scheme, AddressScheme::Standard);
    assert_eq!(
        registry.canonical(&CrsId::new("EPSG:102100")),
        Some(&CrsId::new("EPSG:3857"))
    );
}
