//! Tile address to fetch URL mapping.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use map_common::TileAddress;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::TileGridError;

/// Path appended to a map service URL to address one cached tile.
pub const TILE_PATH_SUFFIX: &str = "/tile/{z}/{y}/{x}";

/// How a host tile address is rewritten before substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressScheme {
    /// Substitute z, x and y unchanged.
    Standard,
    /// Geographic caches: zoom `z - 1`, column `x`, row `-y - 1`.
    ///
    /// The host's global geographic scheme starts one level above the
    /// service's level 0 and counts rows upward with negative indices.
    GeographicOffset,
}

impl AddressScheme {
    /// Values substituted for `{z}`, `{x}` and `{y}`.
    pub fn remap(&self, address: TileAddress) -> (i64, i64, i64) {
        match self {
            AddressScheme::Standard => (address.z as i64, address.x, address.y),
            AddressScheme::GeographicOffset => (address.z as i64 - 1, address.x, -address.y - 1),
        }
    }
}

/// Choice among interchangeable mirrors of one tile cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorPolicy {
    /// Uniformly random mirror per request.
    #[default]
    Random,
    /// Same address always goes to the same mirror.
    HashedByAddress,
}

/// Resolves tile addresses to URLs for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileUrlFunction {
    templates: Vec<String>,
    scheme: AddressScheme,
    policy: MirrorPolicy,
}

impl TileUrlFunction {
    /// Build from one or more service base URLs (mirrors of the same cache).
    pub fn new(
        base_urls: &[String],
        scheme: AddressScheme,
        policy: MirrorPolicy,
    ) -> Result<Self, TileGridError> {
        if base_urls.is_empty() {
            return Err(TileGridError::NoTileSources);
        }

        let templates = base_urls
            .iter()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), TILE_PATH_SUFFIX))
            .collect();

        Ok(Self {
            templates,
            scheme,
            policy,
        })
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn scheme(&self) -> AddressScheme {
        self.scheme
    }

    pub fn policy(&self) -> MirrorPolicy {
        self.policy
    }

    /// Fetch URL for `address`.
    pub fn url(&self, address: TileAddress) -> String {
        let (z, x, y) = self.scheme.remap(address);
        self.template_for(address)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    fn template_for(&self, address: TileAddress) -> &str {
        if self.templates.len() == 1 {
            return &self.templates[0];
        }

        match self.policy {
            MirrorPolicy::Random => self
                .templates
                .choose(&mut rand::thread_rng())
                .map(String::as_str)
                .unwrap_or(self.templates[0].as_str()),
            MirrorPolicy::HashedByAddress => {
                let mut hasher = DefaultHasher::new();
                address.hash(&mut hasher);
                let index = (hasher.finish() % self.templates.len() as u64) as usize;
                &self.templates[index]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_substitution() {
        let f = TileUrlFunction::new(
            &bases(&["https://tiles.example.com/MapServer/"]),
            AddressScheme::Standard,
            MirrorPolicy::Random,
        )
        .unwrap();
        assert_eq!(
            f.url(TileAddress::new(11, 619, 757)),
            "https://tiles.example.com/MapServer/tile/11/757/619"
        );
    }

    #[test]
    fn test_geographic_offset_substitution() {
        let f = TileUrlFunction::new(
            &bases(&["https://geo.example.com/MapServer"]),
            AddressScheme::GeographicOffset,
            MirrorPolicy::Random,
        )
        .unwrap();
        assert_eq!(
            f.url(TileAddress::new(3, 5, -2)),
            "https://geo.example.com/MapServer/tile/2/1/5"
        );
    }

    #[test]
    fn test_no_sources() {
        let err = TileUrlFunction::new(&[], AddressScheme::Standard, MirrorPolicy::Random);
        assert!(matches!(err, Err(TileGridError::NoTileSources)));
    }

    #[test]
    fn test_random_mirror_stays_in_candidate_set() {
        let mirrors = bases(&[
            "https://a.example.com",
            "https://b.example.com",
            "https://c.example.com",
        ]);
        let f = TileUrlFunction::new(&mirrors, AddressScheme::Standard, MirrorPolicy::Random)
            .unwrap();
        for i in 0..200 {
            let url = f.url(TileAddress::new(4, i, i));
            assert!(mirrors.iter().any(|m| url.starts_with(m.as_str())), "{}", url);
        }
    }

    #[test]
    fn test_hashed_mirror_is_stable() {
        let mirrors = bases(&["https://a.example.com", "https://b.example.com"]);
        let f = TileUrlFunction::new(
            &mirrors,
            AddressScheme::Standard,
            MirrorPolicy::HashedByAddress,
        )
        .unwrap();
        let address = TileAddress::new(9, 154, 189);
        let first = f.url(address);
        for _ in 0..20 {
            assert_eq!(f.url(address), first);
        }
    }
}
