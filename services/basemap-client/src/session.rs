//! Map session: grid resolution, layer stack and query handling.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use feature_query::{FeatureQueryEngine, FeatureRecord, FeatureService, QueryResult};
use map_common::crs::EPSG_4326;
use map_common::{CrsId, HttpTransport, Point};
use projection::CrsRegistry;
use tile_grid::{fetch_capabilities, resolve_tile_grid, ResolvedTileGrid};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::layers::BasemapStack;
use crate::render::{render_records, OutputFormat, RecordSink};
use crate::sketch::SketchEvent;

/// Initial center and zoom, center in the display CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialView {
    pub center: Point,
    pub zoom: u32,
}

pub struct BasemapSession<T: HttpTransport> {
    pub config: ClientConfig,
    pub display_crs: CrsId,
    pub grid: ResolvedTileGrid,
    pub stack: BasemapStack,
    pub view: InitialView,
    pub feature_service: FeatureService,
    engine: FeatureQueryEngine<Arc<T>>,
}

impl<T: HttpTransport> BasemapSession<T> {
    /// Fetch capabilities, resolve the shared grid, stack the layers and
    /// locate the feature service.
    pub async fn initialize(config: ClientConfig, transport: Arc<T>) -> Result<Self> {
        let source = config
            .capabilities_service()
            .ok_or_else(|| anyhow!("no map service named {}", config.capabilities_source))?;

        let caps = fetch_capabilities(&*transport, &source.url)
            .await
            .context("Failed to fetch map service capabilities")?;

        let mut registry = CrsRegistry::with_defaults();
        let grid = resolve_tile_grid(&mut registry, &caps).context("Failed to resolve tile grid")?;

        let display_crs = CrsId::new(&config.display_crs);
        if !registry.same_crs(&display_crs, &grid.grid.crs).unwrap_or(false) {
            warn!(
                display = %display_crs,
                grid = %grid.grid.crs,
                "Tile grid CRS differs from display CRS"
            );
        }

        let stack = BasemapStack::build(&grid, &config.map_services, config.mirror_policy)?;

        let center = registry
            .project(
                Point::new(config.view.center_lon, config.view.center_lat),
                &CrsId::new(EPSG_4326),
                &display_crs,
            )
            .context("Failed to project initial view center")?;
        let view = InitialView {
            center,
            zoom: config.view.zoom,
        };

        // Registry is read-only from here on.
        let engine = FeatureQueryEngine::new(Arc::clone(&transport), Arc::new(registry));

        let native_crs = match &config.feature_service.native_crs {
            Some(crs) => CrsId::new(crs),
            None => engine
                .describe_service(&config.feature_service.url)
                .await
                .context("Failed to describe feature service")?
                .native_crs
                .ok_or_else(|| anyhow!("feature service does not report a spatial reference"))?,
        };
        let feature_service = FeatureService::new(config.feature_service.url.clone(), native_crs);

        info!(
            layers = ?stack.layer_names(),
            center_x = view.center.x,
            center_y = view.center.y,
            zoom = view.zoom,
            feature_crs = %feature_service.native_crs,
            "Initialization complete"
        );

        Ok(Self {
            config,
            display_crs,
            grid,
            stack,
            view,
            feature_service,
            engine,
        })
    }

    pub fn registry(&self) -> &CrsRegistry {
        self.engine.registry()
    }

    /// Tabular query; records replace the sink content.
    pub async fn run_tabular_query(
        &self,
        where_clause: &str,
        format: OutputFormat,
        sink: &mut dyn RecordSink,
    ) -> QueryResult<Vec<FeatureRecord>> {
        let records = self
            .engine
            .attribute_query(
                &self.feature_service.url,
                where_clause,
                &self.config.feature_service.out_fields,
            )
            .await?;

        sink.replace(render_records(&records, format));
        Ok(records)
    }

    /// Configured startup query, if any.
    pub async fn run_startup_query(
        &self,
        format: OutputFormat,
        sink: &mut dyn RecordSink,
    ) -> QueryResult<Option<Vec<FeatureRecord>>> {
        match self.config.feature_service.startup_where.clone() {
            Some(where_clause) => self
                .run_tabular_query(&where_clause, format, sink)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    /// Sketch completion: keep the sketch on the overlay and query the
    /// features it intersects.
    pub async fn on_sketch_complete(
        &mut self,
        sketch: SketchEvent,
        format: OutputFormat,
        sink: &mut dyn RecordSink,
    ) -> QueryResult<Vec<FeatureRecord>> {
        info!(vertices = sketch.vertices.len(), "Sketch complete");
        let geometry = sketch.query_geometry();
        self.stack.overlay.add(sketch);

        let records = self
            .engine
            .spatial_query(
                &self.feature_service,
                &geometry,
                &self.display_crs,
                &self.config.feature_service.out_fields,
            )
            .await?;

        sink.replace(render_records(&records, format));
        Ok(records)
    }
}
