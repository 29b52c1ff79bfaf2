use std::error::Error;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flight_server::cache::CacheConfig;
use flight_server::planner::{Heuristic, SearchConfig};
use flight_server::repository::{SqliteRepository, import_dir};
use flight_server::web::{AppState, create_router};

const DEFAULT_DB: &str = "flights.db";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flight_server=info")),
        )
        .init();

    let db_path = PathBuf::from(std::env::var("FLIGHT_DB").unwrap_or_else(|_| DEFAULT_DB.into()));
    let addr: SocketAddr = std::env::var("FLIGHT_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.into())
        .parse()?;

    // Create the schema and load any CSV exports before serving
    prepare_database(&db_path, std::env::var_os("FLIGHT_IMPORT_DIR").map(PathBuf::from))?;

    let search_config = search_config_from_env();
    info!(?search_config, "search configuration");

    let state = AppState::new(db_path, &CacheConfig::default(), search_config);
    let app = create_router(state);

    info!("Flight route planner listening on http://{addr}");
    info!("  GET /health");
    info!("  GET /api/continents");
    info!("  GET /api/countries?continent=EU");
    info!("  GET /api/airports?iso_country=ES");
    info!("  GET /api/path?origin_id=..&destination_id=..&date=YYYY-MM-DD");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn prepare_database(db_path: &Path, import: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let repo = SqliteRepository::open(db_path)?;
    repo.init_schema()?;

    if let Some(dir) = import {
        info!(dir = %dir.display(), "importing CSV data");
        import_dir(&repo, &dir)?;
    }

    info!(
        db = %db_path.display(),
        flights = repo.flight_count()?,
        "database ready"
    );
    Ok(())
}

/// Search configuration with overrides from `FLIGHT_*` variables.
fn search_config_from_env() -> SearchConfig {
    let mut config = SearchConfig::default();

    if let Ok(value) = std::env::var("FLIGHT_HEURISTIC") {
        match value.as_str() {
            "legacy" => config.heuristic = Heuristic::Legacy,
            "travel-time" => {}
            other => warn!(value = other, "unknown FLIGHT_HEURISTIC, using travel-time"),
        }
    }
    if let Some(speed) = env_number::<f64>("FLIGHT_CRUISE_SPEED_KMH").filter(|s| *s > 0.0) {
        if let Heuristic::TravelTime { cruise_speed_kmh } = &mut config.heuristic {
            *cruise_speed_kmh = speed;
        }
    }
    if let Some(mins) = env_number("FLIGHT_MIN_CONNECTION_MINS") {
        config.min_connection_mins = mins;
    }
    if let Some(days) = env_number("FLIGHT_WINDOW_DAYS") {
        config.window_days = days;
    }
    if let Some(limit) = env_number("FLIGHT_MAX_EXPANSIONS") {
        config.max_expansions = Some(limit);
    }
    if let Some(secs) = env_number("FLIGHT_TIMEOUT_SECS") {
        config.timeout_secs = Some(secs);
    }

    config
}

fn env_number<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
