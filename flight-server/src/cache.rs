//! Caching layer for departure lookups.
//!
//! A search asks for the departures of each airport it expands, one
//! calendar day at a time. Popular hubs are expanded by most searches, so
//! the `(airport, day)` lookups are cached across requests. Schedules only
//! change on import, so entries live for a fixed TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Airport, AirportId, Flight};
use crate::planner::FlightRepository;
use crate::repository::RepositoryError;

/// Cache key for departures: (airport, calendar day).
type DepartureKey = (AirportId, NaiveDate);

/// Cached departure list.
type DepartureEntry = Arc<Vec<(Flight, Arc<Airport>)>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Departure lists keyed by `(airport, day)`. Cheap to clone; clones share
/// storage.
#[derive(Clone)]
pub struct DepartureCache {
    departures: MokaCache<DepartureKey, DepartureEntry>,
}

impl DepartureCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let departures = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { departures }
    }

    pub fn get(&self, airport: AirportId, day: NaiveDate) -> Option<DepartureEntry> {
        self.departures.get(&(airport, day))
    }

    pub fn insert(&self, airport: AirportId, day: NaiveDate, entry: DepartureEntry) {
        self.departures.insert((airport, day), entry);
    }

    #[cfg(test)]
    pub fn entry_count(&self) -> u64 {
        self.departures.run_pending_tasks();
        self.departures.entry_count()
    }

    #[cfg(test)]
    pub fn invalidate_all(&self) {
        self.departures.invalidate_all();
    }
}

/// Repository with caching.
///
/// Wraps any `FlightRepository` and serves repeated lookups from a shared
/// `DepartureCache`. Failures are not cached.
pub struct CachedRepository<'a, R> {
    inner: R,
    cache: &'a DepartureCache,
}

impl<'a, R: FlightRepository> CachedRepository<'a, R> {
    pub fn new(inner: R, cache: &'a DepartureCache) -> Self {
        Self { inner, cache }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: FlightRepository> FlightRepository for CachedRepository<'_, R> {
    fn departures(
        &self,
        airport: &Airport,
        day: NaiveDate,
    ) -> Result<Vec<(Flight, Arc<Airport>)>, RepositoryError> {
        if let Some(cached) = self.cache.get(airport.id, day) {
            trace!(airport = %airport.ident, %day, "departure cache hit");
            return Ok(cached.as_ref().clone());
        }

        let departures = self.inner.departures(airport, day)?;
        self.cache
            .insert(airport.id, day, Arc::new(departures.clone()));
        Ok(departures)
    }
}
