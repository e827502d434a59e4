//! Basemap client.
//!
//! Plays the host role around the tile grid resolver and the feature query
//! engine:
//! - Resolves one shared tile grid from a map service's capabilities
//! - Stacks the configured tiled layers on that grid
//! - Runs the startup tabular query and an optional sketch-driven spatial query

mod config;
mod layers;
mod render;
mod session;
mod sketch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use map_common::{BoundingBox, ReqwestTransport, TileAddress};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ClientConfig;
use render::{OutputFormat, StdoutSink};
use session::BasemapSession;
use sketch::SketchEvent;

#[derive(Parser, Debug)]
#[command(name = "basemap-client")]
#[command(about = "Stack tiled basemap layers and query a feature service")]
struct Args {
    /// Configuration file (built-in MassGIS defaults when absent)
    #[arg(long, env = "BASEMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Tabular query to run instead of the configured startup query
    #[arg(long = "where")]
    where_clause: Option<String>,

    /// Sketch extent "minx,miny,maxx,maxy" in the display CRS
    #[arg(long)]
    sketch: Option<String>,

    /// Print tile URLs of every visible layer for this "z/x/y" address
    #[arg(long)]
    tile: Option<String>,

    /// Result rendering
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn parse_tile_address(s: &str) -> Result<TileAddress> {
    let parts: Vec<&str> = s.split('/').map(str::trim).collect();
    if parts.len() != 3 {
        anyhow::bail!("tile address must be z/x/y, got '{}'", s);
    }
    Ok(TileAddress::new(
        parts[0].parse().context("invalid zoom")?,
        parts[1].parse().context("invalid column")?,
        parts[2].parse().context("invalid row")?,
    ))
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    info!(
        capabilities = %config.capabilities_source,
        feature_service = %config.feature_service.url,
        "Starting basemap client"
    );

    let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
    let mut session = BasemapSession::initialize(config, transport).await?;
    let mut sink = StdoutSink;

    if let Some(tile) = &args.tile {
        let address = parse_tile_address(tile)?;
        for (layer, url) in session.stack.tile_urls(address) {
            println!("{}\t{}", layer, url);
        }
    }

    match &args.where_clause {
        Some(where_clause) => {
            session
                .run_tabular_query(where_clause, args.format, &mut sink)
                .await?;
        }
        None => {
            session.run_startup_query(args.format, &mut sink).await?;
        }
    }

    if let Some(extent) = &args.sketch {
        let extent = BoundingBox::from_csv(extent).context("Invalid --sketch extent")?;
        session
            .on_sketch_complete(SketchEvent::from_extent(extent), args.format, &mut sink)
            .await?;
    }

    Ok(())
}
