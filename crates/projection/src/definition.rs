//! CRS definitions: which projection a registered identifier denotes.

use map_common::{CrsKind, Point, Units};

use crate::lambert::LambertConformal;
use crate::mercator;

/// Projection parameters of a registered CRS.
///
/// Every transform goes through geographic lon/lat degrees, so each variant
/// only needs a forward (`from_geographic`) and an inverse (`to_geographic`).
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Longitude/latitude in degrees.
    Geographic,
    /// Spherical Web Mercator in meters.
    WebMercator,
    /// Ellipsoidal Lambert Conformal Conic in meters.
    LambertConformalConic(LambertConformal),
    /// Best-effort definition known only by its unit system. Usable for
    /// identity comparisons, never for coordinate transforms.
    Unspecified { units: Units },
}

impl Projection {
    /// Best-effort definition for a CRS described only by a unit system.
    pub fn from_units(units: Units) -> Self {
        Projection::Unspecified { units }
    }

    pub fn units(&self) -> Units {
        match self {
            Projection::Geographic => Units::Degrees,
            Projection::WebMercator | Projection::LambertConformalConic(_) => Units::Meters,
            Projection::Unspecified { units } => *units,
        }
    }

    pub fn kind(&self) -> CrsKind {
        self.units().kind()
    }

    /// Whether coordinates in this CRS can be converted at all.
    pub fn has_transform(&self) -> bool {
        !matches!(self, Projection::Unspecified { .. })
    }

    /// Inverse projection to lon/lat degrees.
    pub(crate) fn to_geographic(&self, p: Point) -> Option<Point> {
        match self {
            Projection::Geographic => Some(p),
            Projection::WebMercator => Some(mercator::inverse(p.x, p.y)),
            Projection::LambertConformalConic(lcc) => Some(lcc.inverse(p.x, p.y)),
            Projection::Unspecified { .. } => None,
        }
    }

    /// Forward projection from lon/lat degrees.
    pub(crate) fn from_geographic(&self, lonlat: Point) -> Option<Point> {
        match self {
            Projection::Geographic => Some(lonlat),
            Projection::WebMercator => Some(mercator::forward(lonlat.x, lonlat.y)),
            Projection::LambertConformalConic(lcc) => Some(lcc.forward(lonlat.x, lonlat.y)),
            Projection::Unspecified { .. } => None,
        }
    }
}
