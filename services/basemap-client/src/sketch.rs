//! User sketches that drive spatial queries.

use feature_query::QueryGeometry;
use map_common::{BoundingBox, Point};

/// A completed polygon sketch, in the display CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchEvent {
    pub extent: BoundingBox,
    pub vertices: Vec<Point>,
}

impl SketchEvent {
    pub fn from_vertices(vertices: Vec<Point>) -> Option<Self> {
        let extent = BoundingBox::from_points(&vertices)?;
        Some(Self { extent, vertices })
    }

    /// Rectangle sketch.
    pub fn from_extent(extent: BoundingBox) -> Self {
        Self {
            extent,
            vertices: extent.to_ring(),
        }
    }

    /// The drawn polygon, or its extent if too few vertices were drawn.
    pub fn query_geometry(&self) -> QueryGeometry {
        if self.vertices.len() >= 3 {
            QueryGeometry::Polygon(self.vertices.clone())
        } else {
            QueryGeometry::Envelope(self.extent)
        }
    }
}

/// Vector layer above the rasters holding completed sketches.
#[derive(Debug, Default)]
pub struct SketchOverlay {
    sketches: Vec<SketchEvent>,
}

impl SketchOverlay {
    pub fn add(&mut self, sketch: SketchEvent) {
        self.sketches.push(sketch);
    }

    pub fn sketches(&self) -> &[SketchEvent] {
        &self.sketches
    }

    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_from_vertices() {
        let sketch = SketchEvent::from_vertices(vec![
            Point::new(1.0, 5.0),
            Point::new(4.0, 2.0),
            Point::new(3.0, 7.0),
        ])
        .unwrap();
        assert_eq!(sketch.extent, BoundingBox::new(1.0, 2.0, 4.0, 7.0));
        assert!(matches!(sketch.query_geometry(), QueryGeometry::Polygon(_)));
    }

    #[test]
    fn test_short_sketch_falls_back_to_extent() {
        let sketch = SketchEvent {
            extent: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            vertices: vec![Point::new(0.0, 0.0)],
        };
        assert_eq!(
            sketch.query_geometry(),
            QueryGeometry::Envelope(BoundingBox::new(0.0, 0.0, 1.0, 1.0))
        );
        assert!(SketchEvent::from_vertices(Vec::new()).is_none());
    }
}
