use map_common::Point;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ParseError, ResponseParser};
use crate::geometry::{parse_parts, parse_positions, FeatureGeometry};
use crate::record::FeatureRecord;

/// `f=json` responses: Esri feature set with `attributes` per feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsriJsonParser;

#[derive(Debug, Deserialize)]
struct FeatureSet {
    features: Option<Vec<EsriFeature>>,
}

#[derive(Debug, Deserialize)]
struct EsriFeature {
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Value>,
}

impl ResponseParser for EsriJsonParser {
    fn parse(&self, body: &[u8], out_fields: &[String]) -> Result<Vec<FeatureRecord>, ParseError> {
        let set: FeatureSet = serde_json::from_slice(body)?;
        let features = set
            .features
            .ok_or_else(|| ParseError::Shape("missing features array".to_string()))?;

        let empty = Map::new();
        features
            .iter()
            .map(|feature| -> Result<FeatureRecord, ParseError> {
                let geometry = match &feature.geometry {
                    Some(g) if !g.is_null() => Some(geometry(g)?),
                    _ => None,
                };
                let attributes = feature.attributes.as_ref().unwrap_or(&empty);
                Ok(FeatureRecord::from_attributes(attributes, out_fields, geometry))
            })
            .collect()
    }
}

/// Esri geometries carry no type tag; the member present decides.
fn geometry(value: &Value) -> Result<FeatureGeometry, ParseError> {
    let malformed = |kind: &str| ParseError::Shape(format!("malformed {} geometry", kind));

    if let Some(rings) = value.get("rings") {
        return parse_parts(rings)
            .map(|rings| FeatureGeometry::Polygon { rings })
            .ok_or_else(|| malformed("polygon"));
    }
    if let Some(paths) = value.get("paths") {
        return parse_parts(paths)
            .map(|paths| FeatureGeometry::Polyline { paths })
            .ok_or_else(|| malformed("polyline"));
    }
    if let Some(points) = value.get("points") {
        return parse_positions(points)
            .map(|points| FeatureGeometry::MultiPoint { points })
            .ok_or_else(|| malformed("multipoint"));
    }
    if let (Some(x), Some(y)) = (value.get("x"), value.get("y")) {
        return match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok(FeatureGeometry::Point {
                point: Point::new(x, y),
            }),
            _ => Err(malformed("point")),
        };
    }

    Err(ParseError::Shape("unrecognized geometry".to_string()))
}
