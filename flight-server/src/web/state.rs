//! Application state for the web layer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{CacheConfig, DepartureCache};
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Each request opens its own database session, so only the path is kept
/// here; departures are shared across requests through the cache.
#[derive(Clone)]
pub struct AppState {
    /// SQLite database file
    pub db_path: Arc<PathBuf>,

    /// Departure lookups shared between searches
    pub cache: DepartureCache,

    /// Route planner configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(db_path: impl Into<PathBuf>, cache_config: &CacheConfig, config: SearchConfig) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            cache: DepartureCache::new(cache_config),
            config: Arc::new(config),
        }
    }
}
