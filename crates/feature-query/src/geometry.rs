//! Query geometries and returned feature geometries.

use map_common::{BoundingBox, CrsId, Point};
use projection::{CrsRegistry, ProjectionError};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{QueryError, QueryResult};

/// Spatial filter drawn by the user, in the draw surface CRS.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryGeometry {
    /// Axis-aligned box.
    Envelope(BoundingBox),
    /// Outer ring; closed on use if the last vertex does not repeat the first.
    Polygon(Vec<Point>),
}

impl QueryGeometry {
    /// Closed outer ring. Boxes become 5-vertex rings so that every corner
    /// is reprojected, not just two of them.
    pub fn ring(&self) -> QueryResult<Vec<Point>> {
        let mut ring = match self {
            QueryGeometry::Envelope(bbox) => bbox.to_ring(),
            QueryGeometry::Polygon(vertices) => vertices.clone(),
        };

        if ring.iter().any(|p| !p.is_finite()) {
            return Err(QueryError::InvalidGeometry(
                "vertex coordinates must be finite".to_string(),
            ));
        }

        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }

        // Closed ring of a triangle has four vertices.
        if ring.len() < 4 {
            return Err(QueryError::InvalidGeometry(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                ring.len().saturating_sub(1)
            )));
        }
        Ok(ring)
    }

    /// Closed ring expressed in `to`.
    ///
    /// Coordinates are returned unmodified when both identifiers name the
    /// same CRS, registered or not. Any other failure to reconcile the two
    /// is a `CrsMismatch`.
    pub fn ring_in(
        &self,
        registry: &CrsRegistry,
        from: &CrsId,
        to: &CrsId,
    ) -> QueryResult<Vec<Point>> {
        let ring = self.ring()?;

        if from == to {
            return Ok(ring);
        }

        let mismatch = |e: ProjectionError| QueryError::CrsMismatch {
            geometry_crs: from.clone(),
            service_crs: to.clone(),
            reason: e.to_string(),
        };

        if registry.same_crs(from, to).map_err(mismatch)? {
            return Ok(ring);
        }

        registry.project_all(&ring, from, to).map_err(mismatch)
    }
}

/// Esri JSON polygon with a single ring, as sent in the `geometry` parameter.
pub fn esri_polygon(ring: &[Point], wkid: u32) -> Value {
    let coordinates: Vec<[f64; 2]> = ring.iter().map(|p| p.to_array()).collect();
    json!({
        "rings": [coordinates],
        "spatialReference": { "wkid": wkid }
    })
}

/// Geometry of a returned feature, in the CRS of the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureGeometry {
    Point { point: Point },
    MultiPoint { points: Vec<Point> },
    Polyline { paths: Vec<Vec<Point>> },
    Polygon { rings: Vec<Vec<Point>> },
    /// One ring list per polygon, outer ring first.
    MultiPolygon { polygons: Vec<Vec<Vec<Point>>> },
}

/// Parse a `[[x, y], ...]` coordinate list; extra ordinates (z, m) are ignored.
pub(crate) fn parse_positions(value: &Value) -> Option<Vec<Point>> {
    value.as_array()?.iter().map(parse_position).collect()
}

pub(crate) fn parse_position(value: &Value) -> Option<Point> {
    let coords = value.as_array()?;
    let x = coords.first()?.as_f64()?;
    let y = coords.get(1)?.as_f64()?;
    Some(Point::new(x, y))
}

/// Parse `[[[x, y], ...], ...]` (rings or paths).
pub(crate) fn parse_parts(value: &Value) -> Option<Vec<Vec<Point>>> {
    value.as_array()?.iter().map(parse_positions).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_ring_is_closed() {
        let ring = QueryGeometry::Envelope(BoundingBox::new(0.0, 0.0, 2.0, 1.0))
            .ring()
            .unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn test_open_polygon_is_closed() {
        let ring = QueryGeometry::Polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ])
        .ring()
        .unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[3], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let err = QueryGeometry::Polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)])
            .ring()
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidGeometry(_)));

        let err = QueryGeometry::Polygon(vec![Point::new(f64::NAN, 0.0); 4])
            .ring()
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidGeometry(_)));
    }

    #[test]
    fn test_esri_polygon_shape() {
        let ring = QueryGeometry::Envelope(BoundingBox::new(0.0, 0.0, 1.0, 1.0))
            .ring()
            .unwrap();
        let value = esri_polygon(&ring, 26986);
        assert_eq!(value["spatialReference"]["wkid"], 26986);
        assert_eq!(value["rings"][0].as_array().unwrap().len(), 5);
        assert_eq!(value["rings"][0][2], json!([1.0, 1.0]));
    }

    #[test]
    fn test_parse_parts_ignores_extra_ordinates() {
        let parts = parse_parts(&json!([[[1.0, 2.0, 3.0], [4.0, 5.0]]])).unwrap();
        assert_eq!(parts, vec![vec![Point::new(1.0, 2.0), Point::new(4.0, 5.0)]]);
        assert!(parse_parts(&json!([[["a", 2.0]]])).is_none());
    }
}
