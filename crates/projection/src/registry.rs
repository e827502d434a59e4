//! Registry of named CRS definitions.
//!
//! The registry is plain state: callers own it, pass `&mut` while
//! bootstrapping or resolving a map service, and share it read-only
//! afterwards. Definitions are never overwritten.

use std::collections::HashMap;

use map_common::crs::{EPSG_3857, EPSG_4326};
use map_common::{CrsId, CrsKind, Point, Units};
use tracing::debug;

use crate::definition::Projection;
use crate::error::{ProjectionError, Result};
use crate::lambert::LambertConformal;

/// Outcome of a successful [`CrsRegistry::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// Same identifier, same parameters: nothing changed.
    AlreadyDefined,
}

#[derive(Debug, Clone, Default)]
pub struct CrsRegistry {
    definitions: HashMap<CrsId, Projection>,
    /// alias -> canonical identifier (always a key of `definitions`)
    aliases: HashMap<CrsId, CrsId>,
}

impl CrsRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the CRSs this workspace talks to.
    ///
    /// - EPSG:4326 (alias CRS:84)
    /// - EPSG:3857 (aliases EPSG:102100, EPSG:102113, EPSG:900913)
    /// - EPSG:26986, NAD83 / Massachusetts Mainland
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.insert(CrsId::new(EPSG_4326), Projection::Geographic);
        registry.insert(CrsId::new(EPSG_3857), Projection::WebMercator);
        registry.insert(
            CrsId::epsg(26986),
            Projection::LambertConformalConic(LambertConformal::massachusetts_mainland()),
        );

        registry.insert_alias(CrsId::new("CRS:84"), CrsId::new(EPSG_4326));
        for code in [102100, 102113, 900913] {
            registry.insert_alias(CrsId::epsg(code), CrsId::new(EPSG_3857));
        }

        registry
    }

    fn insert(&mut self, id: CrsId, projection: Projection) {
        self.definitions.insert(id, projection);
    }

    fn insert_alias(&mut self, alias: CrsId, canonical: CrsId) {
        self.aliases.insert(alias, canonical);
    }

    /// Register `id` unless it is already known.
    ///
    /// Re-defining with identical parameters is a no-op; with different
    /// parameters it fails and the existing definition is kept.
    pub fn define(&mut self, id: impl Into<CrsId>, projection: Projection) -> Result<Registration> {
        let id = id.into();

        if let Some(existing) = self.get(&id) {
            return if *existing == projection {
                Ok(Registration::AlreadyDefined)
            } else {
                Err(ProjectionError::ConflictingDefinition(id))
            };
        }

        debug!(crs = %id, units = ?projection.units(), "Registering CRS");
        self.insert(id, projection);
        Ok(Registration::Added)
    }

    /// Register `alias` as another name for the CRS known as `target`.
    ///
    /// Fails with `UnknownCrs` if `target` is unknown and with
    /// `ConflictingDefinition` if `alias` already denotes a different CRS.
    pub fn alias(&mut self, alias: impl Into<CrsId>, target: impl Into<CrsId>) -> Result<()> {
        let alias = alias.into();
        let target = target.into();

        let canonical = self
            .canonical(&target)
            .cloned()
            .ok_or(ProjectionError::UnknownCrs(target))?;

        match self.canonical(&alias) {
            Some(existing) if *existing == canonical => return Ok(()),
            Some(_) => return Err(ProjectionError::ConflictingDefinition(alias)),
            None => {}
        }

        debug!(alias = %alias, crs = %canonical, "Registering CRS alias");
        self.insert_alias(alias, canonical);
        Ok(())
    }

    /// The defining identifier behind `id` (itself, or its alias target).
    pub fn canonical(&self, id: &CrsId) -> Option<&CrsId> {
        self.definitions
            .get_key_value(id)
            .map(|(k, _)| k)
            .or_else(|| self.aliases.get(id))
    }

    pub fn contains(&self, id: &CrsId) -> bool {
        self.canonical(id).is_some()
    }

    pub fn get(&self, id: &CrsId) -> Option<&Projection> {
        self.canonical(id).and_then(|c| self.definitions.get(c))
    }

    pub fn kind(&self, id: &CrsId) -> Result<CrsKind> {
        self.lookup(id).map(Projection::kind)
    }

    pub fn units(&self, id: &CrsId) -> Result<Units> {
        self.lookup(id).map(Projection::units)
    }

    /// Whether two identifiers denote the same CRS, aliases included.
    pub fn same_crs(&self, a: &CrsId, b: &CrsId) -> Result<bool> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        Ok(a == b)
    }

    /// Transform `point` from one CRS to another.
    ///
    /// Identity when both identifiers resolve to the same CRS, even if that
    /// CRS has no transform math.
    pub fn project(&self, point: Point, from: &CrsId, to: &CrsId) -> Result<Point> {
        let from_canonical = self.resolve(from)?;
        let to_canonical = self.resolve(to)?;

        if from_canonical == to_canonical {
            return Ok(point);
        }

        let no_transform = || ProjectionError::NoTransform {
            from: from.clone(),
            to: to.clone(),
        };

        let source = &self.definitions[from_canonical];
        let target = &self.definitions[to_canonical];

        let lonlat = source.to_geographic(point).ok_or_else(no_transform)?;
        let projected = target.from_geographic(lonlat).ok_or_else(no_transform)?;

        if !projected.is_finite() {
            return Err(ProjectionError::OutOfDomain {
                crs: to.clone(),
                x: point.x,
                y: point.y,
            });
        }
        Ok(projected)
    }

    /// Transform every point, failing on the first one that cannot be.
    pub fn project_all(&self, points: &[Point], from: &CrsId, to: &CrsId) -> Result<Vec<Point>> {
        points.iter().map(|p| self.project(*p, from, to)).collect()
    }

    fn resolve(&self, id: &CrsId) -> Result<&CrsId> {
        self.canonical(id)
            .ok_or_else(|| ProjectionError::UnknownCrs(id.clone()))
    }

    fn lookup(&self, id: &CrsId) -> Result<&Projection> {
        self.get(id)
            .ok_or_else(|| ProjectionError::UnknownCrs(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_aliases() {
        let registry = CrsRegistry::with_defaults();
        assert_eq!(
            registry.canonical(&CrsId::new("EPSG:102100")),
            Some(&CrsId::new("EPSG:3857"))
        );
        assert!(registry
            .same_crs(&CrsId::new("crs:84"), &CrsId::new("EPSG:4326"))
            .unwrap());
        assert_eq!(
            registry.kind(&CrsId::epsg(26986)).unwrap(),
            CrsKind::Projected
        );
    }

    #[test]
    fn test_alias_to_unknown_target_fails() {
        let mut registry = CrsRegistry::new();
        let err = registry.alias("EPSG:102100", "EPSG:3857").unwrap_err();
        assert_eq!(err, ProjectionError::UnknownCrs(CrsId::new("EPSG:3857")));
    }

    #[test]
    fn test_realiasing_to_other_crs_fails() {
        let mut registry = CrsRegistry::with_defaults();
        registry.alias("EPSG:102100", "EPSG:900913").unwrap();
        let err = registry.alias("EPSG:102100", "EPSG:4326").unwrap_err();
        assert_eq!(
            err,
            ProjectionError::ConflictingDefinition(CrsId::new("EPSG:102100"))
        );
    }
}
