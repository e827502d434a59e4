//! Client configuration.
//!
//! Loaded from a YAML file (see `config/basemap.yaml`); every section has
//! defaults matching the MassGIS basemap and TAZ demographics services.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tile_grid::MirrorPolicy;
use tracing::debug;

const MASSGIS_TILES: &str = "https://tiles.arcgis.com/tiles/hGdibHYSPO59RG1h/arcgis/rest/services";

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// CRS the host map is displayed in.
    #[serde(default = "default_display_crs")]
    pub display_crs: String,
    /// Map service whose capabilities define the shared tile grid.
    #[serde(default = "default_capabilities_source")]
    pub capabilities_source: String,
    /// Tiled map services, listed bottom to top.
    #[serde(default = "default_map_services")]
    pub map_services: Vec<MapServiceConfig>,
    #[serde(default)]
    pub mirror_policy: MirrorPolicy,
    #[serde(default)]
    pub feature_service: FeatureServiceConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// One tiled map service.
#[derive(Debug, Clone, Deserialize)]
pub struct MapServiceConfig {
    pub name: String,
    pub url: String,
    /// Additional base URLs serving the same tile cache.
    #[serde(default)]
    pub mirrors: Vec<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Configured services that are not part of the layer stack.
    #[serde(default = "default_true")]
    pub stacked: bool,
}

impl MapServiceConfig {
    /// Primary URL followed by mirrors.
    pub fn base_urls(&self) -> Vec<String> {
        std::iter::once(self.url.clone())
            .chain(self.mirrors.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureServiceConfig {
    pub url: String,
    /// Native CRS of the layer; discovered from layer metadata when absent.
    #[serde(default)]
    pub native_crs: Option<String>,
    #[serde(default = "default_out_fields")]
    pub out_fields: Vec<String>,
    /// Tabular query run once the map is initialized.
    #[serde(default = "default_startup_where")]
    pub startup_where: Option<String>,
}

impl Default for FeatureServiceConfig {
    fn default() -> Self {
        Self {
            url: "https://services1.arcgis.com/jIRgb54Jq9V3BUeD/ArcGIS/rest/services/sample_taz_demographics/FeatureServer/0".to_string(),
            native_crs: None,
            out_fields: default_out_fields(),
            startup_where: default_startup_where(),
        }
    }
}

/// Initial map view, center given in lon/lat degrees.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center_lon: -71.0589,
            center_lat: 42.3601,
            zoom: 11,
        }
    }
}

fn default_display_crs() -> String {
    "EPSG:3857".to_string()
}

fn default_capabilities_source() -> String {
    "topo_features".to_string()
}

fn default_map_services() -> Vec<MapServiceConfig> {
    let service = |name: &str, path: &str, stacked: bool| MapServiceConfig {
        name: name.to_string(),
        url: format!("{}/{}/MapServer", MASSGIS_TILES, path),
        mirrors: Vec::new(),
        visible: true,
        stacked,
    };

    vec![
        service("topo_features", "MassGIS_Topographic_Features_for_Basemap", true),
        service("structures", "MassGIS_Structures", true),
        // Labels live here, so it sits above structures.
        service("basemap_features", "MassGIS_Basemap_Detailed_Features", true),
        service("parcels", "MassGIS_Level3_Parcels", false),
    ]
}

fn default_out_fields() -> Vec<String> {
    ["taz", "town", "total_pop_2010", "total_pop_2016"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_startup_where() -> Option<String> {
    Some("town='ARLINGTON'".to_string())
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            display_crs: default_display_crs(),
            capabilities_source: default_capabilities_source(),
            map_services: default_map_services(),
            mirror_policy: MirrorPolicy::default(),
            feature_service: FeatureServiceConfig::default(),
            view: ViewConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ClientConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        debug!(
            path = %path.display(),
            services = config.map_services.len(),
            "Loaded client config"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.capabilities_service().is_none() {
            bail!(
                "capabilities_source '{}' does not name a configured map service",
                self.capabilities_source
            );
        }
        Ok(())
    }

    pub fn capabilities_service(&self) -> Option<&MapServiceConfig> {
        self.map_services
            .iter()
            .find(|s| s.name == self.capabilities_source)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_massgis_setup() {
        let config = ClientConfig::default();
        let names: Vec<&str> = config.map_services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["topo_features", "structures", "basemap_features", "parcels"]);
        assert!(!config.map_services[3].stacked);
        assert_eq!(config.capabilities_service().unwrap().name, "topo_features");
        assert_eq!(config.view.zoom, 11);
        assert_eq!(
            config.feature_service.startup_where.as_deref(),
            Some("town='ARLINGTON'")
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
display_crs: "EPSG:3857"
capabilities_source: roads
mirror_policy: hashed_by_address
map_services:
  - name: roads
    url: "https://a.example.com/MapServer"
    mirrors: ["https://b.example.com/MapServer"]
feature_service:
  url: "https://features.example.com/FeatureServer/0"
  native_crs: "EPSG:26986"
  startup_where: null
"#;
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.mirror_policy, MirrorPolicy::HashedByAddress);
        assert_eq!(config.map_services[0].base_urls().len(), 2);
        assert!(config.map_services[0].visible);
        assert_eq!(config.feature_service.out_fields.len(), 4);
        assert!(config.feature_service.startup_where.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_rejects_unknown_capabilities_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capabilities_source: nowhere").unwrap();

        let err = ClientConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs: 5").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.map_services.len(), 4);
    }
}
