use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ParseError, ResponseParser};
use crate::geometry::{parse_parts, parse_position, parse_positions, FeatureGeometry};
use crate::record::FeatureRecord;

/// `f=geojson` responses: a FeatureCollection with `properties` per feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonParser;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: Option<String>,
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Value>,
}

impl ResponseParser for GeoJsonParser {
    fn parse(&self, body: &[u8], out_fields: &[String]) -> Result<Vec<FeatureRecord>, ParseError> {
        let collection: FeatureCollection = serde_json::from_slice(body)?;

        match collection.kind.as_deref() {
            Some("FeatureCollection") => {}
            Some(kind) => {
                return Err(ParseError::Shape(format!(
                    "expected a FeatureCollection, got {}",
                    kind
                )));
            }
            None => {
                return Err(ParseError::Shape(
                    "response is not a FeatureCollection".to_string(),
                ));
            }
        }
        let features = collection
            .features
            .ok_or_else(|| ParseError::Shape("FeatureCollection without features".to_string()))?;

        let empty = Map::new();
        features
            .iter()
            .map(|feature| -> Result<FeatureRecord, ParseError> {
                let geometry = match &feature.geometry {
                    Some(g) if !g.is_null() => Some(geometry(g)?),
                    _ => None,
                };
                let properties = feature.properties.as_ref().unwrap_or(&empty);
                Ok(FeatureRecord::from_attributes(properties, out_fields, geometry))
            })
            .collect()
    }
}

fn geometry(value: &Value) -> Result<FeatureGeometry, ParseError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::Shape("geometry without type".to_string()))?;
    let coordinates = value
        .get("coordinates")
        .ok_or_else(|| ParseError::Shape(format!("{} geometry without coordinates", kind)))?;

    let parsed = match kind {
        "Point" => parse_position(coordinates).map(|point| FeatureGeometry::Point { point }),
        "MultiPoint" => {
            parse_positions(coordinates).map(|points| FeatureGeometry::MultiPoint { points })
        }
        "LineString" => {
            parse_positions(coordinates).map(|path| FeatureGeometry::Polyline { paths: vec![path] })
        }
        "MultiLineString" => {
            parse_parts(coordinates).map(|paths| FeatureGeometry::Polyline { paths })
        }
        "Polygon" => parse_parts(coordinates).map(|rings| FeatureGeometry::Polygon { rings }),
        "MultiPolygon" => coordinates
            .as_array()
            .and_then(|polygons| {
                polygons
                    .iter()
                    .map(parse_parts)
                    .collect::<Option<Vec<_>>>()
            })
            .map(|polygons| FeatureGeometry::MultiPolygon { polygons }),
        other => {
            return Err(ParseError::Shape(format!("unsupported geometry type {}", other)));
        }
    };

    parsed.ok_or_else(|| ParseError::Shape(format!("malformed {} coordinates", kind)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::Point;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_point_and_null_geometry() {
        let body = br#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-71.1, 42.4]}, "properties": {"name": "a"}},
                {"type": "Feature", "geometry": null, "properties": {"name": "b"}}
            ]
        }"#;
        let records = GeoJsonParser.parse(body, &fields(&["name"])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].geometry,
            Some(FeatureGeometry::Point {
                point: Point::new(-71.1, 42.4)
            })
        );
        assert!(records[1].geometry.is_none());
    }

    #[test]
    fn test_multipolygon_keeps_polygon_grouping() {
        let body = br#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0,0],[1,0],[1,1],[0,0]]],
                    [[[5,5],[6,5],[6,6],[5,5]]]
                ]}
            }]
        }"#;
        let records = GeoJsonParser.parse(body, &fields(&["*"])).unwrap();
        match &records[0].geometry {
            Some(FeatureGeometry::MultiPolygon { polygons }) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[0].len(), 1);
                assert_eq!(polygons[1][0][0], Point::new(5.0, 5.0));
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_document_type() {
        let err = GeoJsonParser
            .parse(br#"{"type": "Feature", "properties": {}}"#, &fields(&["*"]))
            .unwrap_err();
        assert!(matches!(err, ParseError::Shape(_)));
    }

    #[test]
    fn test_missing_collection_shape() {
        for body in [
            &br#"{"unexpected": true}"#[..],
            &br#"{"count": 12}"#[..],
            &br#"{"type": "FeatureCollection"}"#[..],
        ] {
            let err = GeoJsonParser.parse(body, &fields(&["*"])).unwrap_err();
            assert!(matches!(err, ParseError::Shape(_)));
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = GeoJsonParser.parse(b"not json", &fields(&["*"])).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
