//! Canned service documents for basemap tests.
//!
//! These mirror the shape of real ArcGIS REST responses (MassGIS tiled
//! basemap services and a TAZ demographics feature layer), trimmed to the
//! fields the workspace reads.

/// Map service capability documents (`<MapServer>?f=json`).
pub mod capabilities {
    /// Web Mercator tiled service, reported under the Esri alias wkid 102100.
    pub const WEB_MERCATOR: &str = r#"{
        "currentVersion": 10.81,
        "serviceDescription": "MassGIS topographic features for basemap",
        "copyrightText": "MassGIS, Commonwealth of Massachusetts EOTSS",
        "units": "esriMeters",
        "spatialReference": { "wkid": 102100, "latestWkid": 3857 },
        "fullExtent": {
            "xmin": -8192337.0, "ymin": 5041002.0,
            "xmax": -7760880.0, "ymax": 5278066.0,
            "spatialReference": { "wkid": 102100, "latestWkid": 3857 }
        },
        "tileInfo": {
            "rows": 256,
            "cols": 256,
            "dpi": 96,
            "format": "PNG32",
            "origin": { "x": -20037508.342787, "y": 20037508.342787 },
            "spatialReference": { "wkid": 102100, "latestWkid": 3857 },
            "lods": [
                { "level": 0, "resolution": 156543.03392800014, "scale": 591657527.591555 },
                { "level": 1, "resolution": 78271.51696399994, "scale": 295828763.795777 },
                { "level": 2, "resolution": 39135.75848200009, "scale": 147914381.897889 },
                { "level": 3, "resolution": 19567.87924099992, "scale": 73957190.948944 },
                { "level": 4, "resolution": 9783.93962049996, "scale": 36978595.474472 },
                { "level": 5, "resolution": 4891.96981024998, "scale": 18489297.737236 },
                { "level": 6, "resolution": 2445.98490512499, "scale": 9244648.868618 },
                { "level": 7, "resolution": 1222.992452562495, "scale": 4622324.434309 },
                { "level": 8, "resolution": 611.4962262813797, "scale": 2311162.217155 },
                { "level": 9, "resolution": 305.74811314055756, "scale": 1155581.108577 },
                { "level": 10, "resolution": 152.87405657041106, "scale": 577790.554289 },
                { "level": 11, "resolution": 76.43702828507324, "scale": 288895.277144 },
                { "level": 12, "resolution": 38.21851414253662, "scale": 144447.638572 },
                { "level": 13, "resolution": 19.10925707126831, "scale": 72223.819286 },
                { "level": 14, "resolution": 9.554628535634155, "scale": 36111.909643 },
                { "level": 15, "resolution": 4.77731426794937, "scale": 18055.954822 },
                { "level": 16, "resolution": 2.388657133974685, "scale": 9027.977411 },
                { "level": 17, "resolution": 1.1943285668550503, "scale": 4513.988705 },
                { "level": 18, "resolution": 0.5971642835598172, "scale": 2256.994353 },
                { "level": 19, "resolution": 0.29858214164761665, "scale": 1128.497176 }
            ]
        }
    }"#;

    /// Geographic (EPSG:4326) tiled service using `width`/`height` keys.
    pub const GEOGRAPHIC: &str = r#"{
        "copyrightText": "Sample geographic cache",
        "units": "esriDecimalDegrees",
        "spatialReference": { "wkid": 4326 },
        "fullExtent": { "xmin": -180.0, "ymin": -90.0, "xmax": 180.0, "ymax": 90.0 },
        "tileInfo": {
            "width": 512,
            "height": 512,
            "origin": { "x": -180.0, "y": 90.0 },
            "lods": [
                { "level": 0, "resolution": 0.3515625 },
                { "level": 1, "resolution": 0.17578125 },
                { "level": 2, "resolution": 0.087890625 }
            ]
        }
    }"#;

    /// Projected service whose LODs are listed finest-first.
    pub const OUT_OF_ORDER_LODS: &str = r#"{
        "units": "esriMeters",
        "spatialReference": { "wkid": 26986 },
        "tileInfo": {
            "rows": 256,
            "cols": 256,
            "origin": { "x": 0.0, "y": 1200000.0 },
            "lods": [
                { "level": 0, "resolution": 4.0 },
                { "level": 1, "resolution": 16.0 },
                { "level": 2, "resolution": 8.0 }
            ]
        }
    }"#;

    /// Service in a CRS the default registry does not know.
    pub const UNKNOWN_PROJECTED: &str = r#"{
        "units": "esriMeters",
        "spatialReference": { "wkid": 2249 },
        "tileInfo": {
            "rows": 256,
            "cols": 256,
            "origin": { "x": -1000000.0, "y": 5000000.0 },
            "lods": [ { "level": 0, "resolution": 1000.0 } ]
        }
    }"#;

    pub const EMPTY_LODS: &str = r#"{
        "units": "esriMeters",
        "spatialReference": { "wkid": 3857 },
        "tileInfo": {
            "rows": 256, "cols": 256,
            "origin": { "x": 0.0, "y": 0.0 },
            "lods": []
        }
    }"#;

    pub const MISSING_ORIGIN: &str = r#"{
        "units": "esriMeters",
        "spatialReference": { "wkid": 3857 },
        "tileInfo": {
            "rows": 256, "cols": 256,
            "lods": [ { "level": 0, "resolution": 156543.03392800014 } ]
        }
    }"#;

    pub const MISSING_WKID: &str = r#"{
        "units": "esriMeters",
        "spatialReference": { "wkt": "PROJCS[...]" },
        "tileInfo": {
            "rows": 256, "cols": 256,
            "origin": { "x": 0.0, "y": 0.0 },
            "lods": [ { "level": 0, "resolution": 1.0 } ]
        }
    }"#;

    pub const MISSING_TILE_SIZE: &str = r#"{
        "units": "esriMeters",
        "spatialReference": { "wkid": 3857 },
        "tileInfo": {
            "origin": { "x": 0.0, "y": 0.0 },
            "lods": [ { "level": 0, "resolution": 1.0 } ]
        }
    }"#;
}

/// Feature service query responses.
pub mod features {
    /// `town='ARLINGTON'` answered as GeoJSON (`f=geojson`).
    pub const ARLINGTON_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 1,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-71.16, 42.41], [-71.15, 42.41], [-71.15, 42.42], [-71.16, 42.42], [-71.16, 42.41]]]
                },
                "properties": { "taz": 1025, "town": "ARLINGTON", "total_pop_2010": 2547, "total_pop_2016": 2611 }
            },
            {
                "type": "Feature",
                "id": 2,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-71.18, 42.42], [-71.17, 42.42], [-71.17, 42.43], [-71.18, 42.43], [-71.18, 42.42]]]
                },
                "properties": { "taz": 1019, "town": "ARLINGTON", "total_pop_2010": 3120, "total_pop_2016": null }
            }
        ]
    }"#;

    /// The same two zones answered as Esri JSON (`f=json`) in EPSG:26986.
    pub const ARLINGTON_ESRI_JSON: &str = r#"{
        "objectIdFieldName": "OBJECTID",
        "geometryType": "esriGeometryPolygon",
        "spatialReference": { "wkid": 26986, "latestWkid": 26986 },
        "fields": [
            { "name": "taz", "type": "esriFieldTypeInteger" },
            { "name": "town", "type": "esriFieldTypeString" },
            { "name": "total_pop_2010", "type": "esriFieldTypeInteger" },
            { "name": "total_pop_2016", "type": "esriFieldTypeInteger" }
        ],
        "features": [
            {
                "attributes": { "TAZ": 1025, "TOWN": "ARLINGTON", "TOTAL_POP_2010": 2547, "TOTAL_POP_2016": 2611 },
                "geometry": { "rings": [[[223000.0, 906000.0], [223800.0, 906000.0], [223800.0, 907100.0], [223000.0, 907100.0], [223000.0, 906000.0]]] }
            },
            {
                "attributes": { "TAZ": 1019, "TOWN": "ARLINGTON", "TOTAL_POP_2010": 3120, "TOTAL_POP_2016": null },
                "geometry": { "rings": [[[221400.0, 907100.0], [222200.0, 907100.0], [222200.0, 908200.0], [221400.0, 908200.0], [221400.0, 907100.0]]] }
            }
        ]
    }"#;

    pub const EMPTY_GEOJSON: &str = r#"{ "type": "FeatureCollection", "features": [] }"#;

    /// ArcGIS reports query failures with HTTP 200 and an error envelope.
    pub const SERVICE_ERROR: &str = r#"{
        "error": {
            "code": 400,
            "message": "Unable to complete operation.",
            "details": ["Unable to perform query operation."]
        }
    }"#;

    /// Feature layer description (`<FeatureServer/0>?f=json`).
    pub const TAZ_LAYER_INFO: &str = r#"{
        "id": 0,
        "name": "sample_taz_demographics",
        "type": "Feature Layer",
        "geometryType": "esriGeometryPolygon",
        "sourceSpatialReference": { "wkid": 26986, "latestWkid": 26986 },
        "extent": {
            "xmin": 33863.0, "ymin": 777606.0, "xmax": 330837.0, "ymax": 959743.0,
            "spatialReference": { "wkid": 26986, "latestWkid": 26986 }
        },
        "fields": [
            { "name": "OBJECTID", "type": "esriFieldTypeOID" },
            { "name": "taz", "type": "esriFieldTypeInteger" },
            { "name": "town", "type": "esriFieldTypeString" },
            { "name": "total_pop_2010", "type": "esriFieldTypeInteger" },
            { "name": "total_pop_2016", "type": "esriFieldTypeInteger" }
        ]
    }"#;
}

/// Service endpoints used across tests. None of these are contacted.
pub mod urls {
    pub const TOPO_FEATURES: &str = "https://tiles.example.com/arcgis/rest/services/Topographic_Features/MapServer";
    pub const STRUCTURES: &str = "https://tiles.example.com/arcgis/rest/services/Structures/MapServer";
    pub const BASEMAP_FEATURES: &str = "https://tiles.example.com/arcgis/rest/services/Detailed_Features/MapServer";
    pub const TAZ_FEATURE_LAYER: &str = "https://services.example.com/arcgis/rest/services/sample_taz_demographics/FeatureServer/0";
}

/// Output fields requested by the demographic queries.
pub const TAZ_FIELDS: [&str; 4] = ["taz", "town", "total_pop_2010", "total_pop_2016"];
