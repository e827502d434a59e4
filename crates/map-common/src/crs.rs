//! Coordinate reference system identifiers and unit systems.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known identifier of the WGS84 longitude/latitude CRS.
pub const EPSG_4326: &str = "EPSG:4326";

/// Spherical Web Mercator, the usual display CRS of web maps.
pub const EPSG_3857: &str = "EPSG:3857";

/// Normalized CRS identifier such as `EPSG:3857`.
///
/// Identifiers are trimmed and upper-cased on construction so that
/// `epsg:3857` and `EPSG:3857` compare equal. Aliases (the same projection
/// under a different code) are resolved by the CRS registry, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CrsId(String);

impl CrsId {
    pub fn new(id: impl AsRef<str>) -> Self {
        CrsId(id.as_ref().trim().to_uppercase())
    }

    /// Build `EPSG:<code>` from an Esri/EPSG well-known id.
    pub fn epsg(code: u32) -> Self {
        CrsId(format!("EPSG:{}", code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric code when the identifier has the `EPSG:<n>` form.
    pub fn epsg_code(&self) -> Option<u32> {
        self.0.strip_prefix("EPSG:")?.parse().ok()
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CrsId {
    fn from(s: &str) -> Self {
        CrsId::new(s)
    }
}

impl From<String> for CrsId {
    fn from(s: String) -> Self {
        CrsId::new(s)
    }
}

impl From<CrsId> for String {
    fn from(id: CrsId) -> Self {
        id.0
    }
}

/// Whether a CRS measures positions as angles or as planar distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrsKind {
    /// Longitude/latitude in degrees.
    Geographic,
    /// Easting/northing in linear units.
    Projected,
}

/// Unit system of a CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    Meters,
    Degrees,
}

impl Units {
    /// Map an Esri unit name (`esriMeters`, `esriDecimalDegrees`, ...).
    ///
    /// Only `esriMeters` is linear; everything else, including a missing
    /// value, is treated as angular degrees.
    pub fn from_esri(name: Option<&str>) -> Self {
        match name {
            Some("esriMeters") => Units::Meters,
            _ => Units::Degrees,
        }
    }

    pub fn kind(&self) -> CrsKind {
        match self {
            Units::Meters => CrsKind::Projected,
            Units::Degrees => CrsKind::Geographic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_id_normalization() {
        assert_eq!(CrsId::new(" epsg:3857 "), CrsId::new(EPSG_3857));
        assert_eq!(CrsId::epsg(4326).as_str(), EPSG_4326);
    }

    #[test]
    fn test_epsg_code() {
        assert_eq!(CrsId::new("EPSG:26986").epsg_code(), Some(26986));
        assert_eq!(CrsId::new("CRS:84").epsg_code(), None);
    }

    #[test]
    fn test_units_from_esri() {
        assert_eq!(Units::from_esri(Some("esriMeters")), Units::Meters);
        assert_eq!(Units::from_esri(Some("esriDecimalDegrees")), Units::Degrees);
        assert_eq!(Units::from_esri(None), Units::Degrees);
        assert_eq!(Units::Meters.kind(), CrsKind::Projected);
    }
}
