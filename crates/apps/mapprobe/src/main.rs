use std::env;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use client::{BackendError, CycleOutcome, MapSession};
use foundation::geo::{GeoBounds, GeoPoint};
use protocol::request::SearchRequest;
use protocol::response::{decode_results, SearchResults};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod geojson;

use geojson::GeoJsonSurface;

/// Run one query cycle against a facility search endpoint and write the
/// rendered geometry set as a GeoJSON FeatureCollection.
#[derive(Debug, Parser)]
#[command(name = "mapprobe")]
struct Args {
    /// Search endpoint URL; falls back to the SEARCH_URL environment variable.
    #[arg(long)]
    url: Option<String>,

    /// Map zoom level.
    #[arg(long, default_value_t = 5)]
    zoom: u8,

    /// Viewport corners in degrees: north west south east.
    #[arg(long, num_args = 4, value_names = ["N", "W", "S", "E"], allow_hyphen_values = true)]
    bounds: Option<Vec<f64>>,

    /// Free-text filter over facility name and address.
    #[arg(long)]
    query: Option<String>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let url = args
        .url
        .or_else(|| env::var("SEARCH_URL").ok())
        .ok_or("no search endpoint: pass --url or set SEARCH_URL")?;

    let mut session = MapSession::new(args.zoom);
    if let Some(b) = &args.bounds {
        let north_east = GeoPoint::new(b[0], b[3]);
        let south_west = GeoPoint::new(b[2], b[1]);
        session
            .tracker_mut()
            .on_bounds_changed(GeoBounds::new(north_east, south_west));
    }
    session.tracker_mut().set_text_query(args.query.clone());

    let issued = session.on_tiles_loaded();
    info!(cycle = issued.cycle.0, url = %url, "sending search request");

    let http = reqwest::Client::new();
    let outcome = search(&http, &url, &issued.request).await;

    let mut surface = GeoJsonSurface::default();
    match session.complete(&mut surface, issued.cycle, outcome) {
        CycleOutcome::Rendered(summary) => {
            info!(
                polygons = summary.polygons,
                markers = summary.markers,
                skipped = summary.skipped_cells,
                "rendered geometry set"
            );
        }
        CycleOutcome::Failed => return Err("search request failed".to_string()),
        CycleOutcome::Stale => return Err("response discarded as stale".to_string()),
    }

    let doc = surface.into_feature_collection();
    let text = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
    match &args.out {
        Some(path) => {
            fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))?;
        }
        None => println!("{text}"),
    }

    Ok(())
}

async fn search(
    http: &reqwest::Client,
    url: &str,
    request: &SearchRequest,
) -> Result<SearchResults, BackendError> {
    let response = http
        .post(url)
        .json(request)
        .send()
        .await
        .map_err(|e| BackendError::Transport {
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            code: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| BackendError::Transport {
        message: e.to_string(),
    })?;

    decode_results(&body).map_err(|e| BackendError::Decode {
        message: e.to_string(),
    })
}
