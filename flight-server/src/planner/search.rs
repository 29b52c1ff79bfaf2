//! Time-dependent A* route search.
//!
//! Finds the itinerary with the least elapsed time from an origin airport
//! to a destination. The flight graph is never built up front: each time an
//! airport is expanded, its departures for the day the traveller is there
//! are fetched from the repository.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, trace, warn};

use crate::domain::{Airport, AirportId, Flight, Itinerary, day_start};
use crate::repository::RepositoryError;

use super::config::SearchConfig;
use super::cost::{CostModel, Provenance};
use super::frontier::Frontier;
use super::reconstruct::{Predecessors, reconstruct};

/// Error from route search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Failed to fetch departures, after any retries
    #[error("failed to fetch departures from airport {airport}: {source}")]
    Repository {
        airport: AirportId,
        source: RepositoryError,
    },

    /// Expansion cap reached before the search finished
    #[error("search gave up after expanding {0} airports")]
    ExpansionLimit(usize),

    /// Search timed out
    #[error("search timed out")]
    Timeout,

    /// Predecessor map does not lead back to the origin
    #[error("predecessor map is inconsistent at airport {0}")]
    InconsistentPredecessors(AirportId),
}

/// Source of scheduled departures.
///
/// This abstraction allows the planner to be tested with mock data.
pub trait FlightRepository {
    /// Flights departing `airport` during calendar day `day`, each paired
    /// with the airport it lands at.
    ///
    /// Only flights whose departure falls within `[day 00:00, next day
    /// 00:00)` and whose origin is `airport` may be returned. Order is not
    /// significant beyond tie-breaking.
    fn departures(
        &self,
        airport: &Airport,
        day: NaiveDate,
    ) -> Result<Vec<(Flight, Arc<Airport>)>, RepositoryError>;
}

impl<R: FlightRepository + ?Sized> FlightRepository for &R {
    fn departures(
        &self,
        airport: &Airport,
        day: NaiveDate,
    ) -> Result<Vec<(Flight, Arc<Airport>)>, RepositoryError> {
        (**self).departures(airport, day)
    }
}

/// Request for route search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub origin: Arc<Airport>,
    pub destination: Arc<Airport>,

    /// Reference time. The first flight is taken from this calendar day.
    pub earliest_departure: NaiveDateTime,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        origin: Arc<Airport>,
        destination: Arc<Airport>,
        earliest_departure: NaiveDateTime,
    ) -> Self {
        Self {
            origin,
            destination,
            earliest_departure,
        }
    }

    /// Request departing from midnight of `date`.
    pub fn on_date(origin: Arc<Airport>, destination: Arc<Airport>, date: NaiveDate) -> Self {
        Self::new(origin, destination, day_start(date))
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A route was found.
    Found(Itinerary),

    /// No sequence of flights reaches the destination.
    NotFound { destination: Arc<Airport> },

    /// Origin and destination are the same airport; nothing to fly.
    Trivial { destination: Arc<Airport> },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        match self {
            SearchOutcome::Found(itinerary) => Some(itinerary),
            _ => None,
        }
    }

    /// The destination airport, whatever the outcome.
    pub fn destination(&self) -> &Arc<Airport> {
        match self {
            SearchOutcome::Found(itinerary) => itinerary.destination(),
            SearchOutcome::NotFound { destination } | SearchOutcome::Trivial { destination } => {
                destination
            }
        }
    }

    /// Flattens into `(legs, destination)`. Legs are empty unless found.
    pub fn into_parts(self) -> (Vec<(Arc<Airport>, Flight)>, Arc<Airport>) {
        match self {
            SearchOutcome::Found(itinerary) => itinerary.into_parts(),
            SearchOutcome::NotFound { destination } | SearchOutcome::Trivial { destination } => {
                (Vec::new(), destination)
            }
        }
    }
}

/// Result of route search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,

    /// Number of airports expanded.
    pub expansions: usize,

    /// Number of repository queries made, including retries.
    pub repository_calls: usize,
}

/// Frontier payload for an airport.
#[derive(Debug)]
struct Node {
    airport: Arc<Airport>,
    provenance: Provenance,
}

/// Route planner using time-dependent A*.
pub struct Planner<'a, R: FlightRepository> {
    repository: &'a R,
    config: &'a SearchConfig,
    costs: CostModel,
}

impl<'a, R: FlightRepository> Planner<'a, R> {
    /// Create a new planner.
    pub fn new(repository: &'a R, config: &'a SearchConfig) -> Self {
        Self {
            repository,
            config,
            costs: CostModel::new(config),
        }
    }

    /// Find the route with least elapsed time, returning just the outcome.
    pub fn find_path(
        &self,
        origin: Arc<Airport>,
        destination: Arc<Airport>,
        earliest_departure: NaiveDateTime,
    ) -> Result<SearchOutcome, SearchError> {
        let request = SearchRequest::new(origin, destination, earliest_departure);
        Ok(self.search(&request)?.outcome)
    }

    /// Search for a route from origin to destination.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let origin = &request.origin;
        let destination = &request.destination;

        debug!(
            origin = %origin.ident,
            destination = %destination.ident,
            earliest_departure = %request.earliest_departure,
            "starting route search"
        );

        if origin.id == destination.id {
            return Ok(SearchResult {
                outcome: SearchOutcome::Trivial {
                    destination: destination.clone(),
                },
                expansions: 0,
                repository_calls: 0,
            });
        }

        let started = Instant::now();
        let deadline = self.config.timeout();

        let mut frontier: Frontier<AirportId, Node> = Frontier::new();
        let mut best: HashMap<AirportId, Duration> = HashMap::new();
        let mut expanded: HashSet<AirportId> = HashSet::new();
        let mut predecessors = Predecessors::new();

        frontier.upsert(
            origin.id,
            self.costs.score(Duration::zero(), origin, destination),
            Node {
                airport: origin.clone(),
                provenance: Provenance::Reference(request.earliest_departure),
            },
        );
        best.insert(origin.id, Duration::zero());

        let mut expansions = 0;
        let mut repository_calls = 0;

        while let Some((current, f, node)) = frontier.pop() {
            if current == destination.id {
                let itinerary = reconstruct(&predecessors, origin, destination)?;
                debug!(
                    expansions,
                    repository_calls,
                    legs = itinerary.leg_count(),
                    "route found"
                );
                return Ok(SearchResult {
                    outcome: SearchOutcome::Found(itinerary),
                    expansions,
                    repository_calls,
                });
            }

            if self
                .config
                .max_expansions
                .is_some_and(|limit| expansions >= limit)
            {
                warn!(expansions, "expansion limit reached");
                return Err(SearchError::ExpansionLimit(expansions));
            }
            if deadline.is_some_and(|limit| started.elapsed() > limit) {
                warn!(expansions, "search deadline passed");
                return Err(SearchError::Timeout);
            }

            expansions += 1;
            expanded.insert(current);
            let g_current = best.get(&current).copied().unwrap_or_else(Duration::zero);
            trace!(
                airport = %node.airport.ident,
                f,
                g_secs = g_current.num_seconds(),
                open = frontier.len(),
                "expanding"
            );

            let first_day = node.provenance.lookup_day();
            for offset in 0..self.config.window_days() {
                let Some(day) = first_day.checked_add_days(Days::new(u64::from(offset))) else {
                    break;
                };

                let departures = self.fetch(&node.airport, day, &mut repository_calls)?;

                for (flight, neighbor) in departures {
                    if flight.origin() != current || flight.destination() != neighbor.id {
                        warn!(
                            flight = %flight.id(),
                            airport = %current,
                            "repository returned a flight that does not match its airports"
                        );
                        continue;
                    }

                    let step = match self.costs.edge_cost(&node.provenance, &flight) {
                        Ok(step) => step,
                        Err(missed) => {
                            trace!(reason = %missed, "skipping flight");
                            continue;
                        }
                    };

                    // Expanded airports are settled; their successors were
                    // scored against the provenance they were expanded with.
                    if expanded.contains(&neighbor.id) {
                        trace!(
                            airport = %neighbor.ident,
                            flight = %flight.id(),
                            "airport already expanded"
                        );
                        continue;
                    }

                    let tentative = g_current + step;
                    let improves = best
                        .get(&neighbor.id)
                        .is_none_or(|known| tentative < *known);
                    if !improves {
                        continue;
                    }

                    best.insert(neighbor.id, tentative);
                    predecessors.insert(neighbor.id, (node.airport.clone(), flight.clone()));

                    let f = self.costs.score(tentative, &neighbor, destination);
                    frontier.upsert(
                        neighbor.id,
                        f,
                        Node {
                            airport: neighbor,
                            provenance: Provenance::Arrived(flight),
                        },
                    );
                }
            }
        }

        debug!(expansions, repository_calls, "no route found");

        Ok(SearchResult {
            outcome: SearchOutcome::NotFound {
                destination: destination.clone(),
            },
            expansions,
            repository_calls,
        })
    }

    /// Fetch departures, retrying transient failures with backoff.
    fn fetch(
        &self,
        airport: &Airport,
        day: NaiveDate,
        calls: &mut usize,
    ) -> Result<Vec<(Flight, Arc<Airport>)>, SearchError> {
        let mut attempt = 0;
        loop {
            *calls += 1;
            match self.repository.departures(airport, day) {
                Ok(departures) => return Ok(departures),
                Err(e) if e.is_transient() && attempt < self.config.fetch_retries => {
                    let backoff = self.config.retry_backoff(attempt);
                    warn!(
                        airport = %airport.id,
                        %day,
                        attempt,
                        error = %e,
                        "transient repository failure, retrying"
                    );
                    std::thread::sleep(backoff);
                    attempt += 1;
                }
                Err(source) => {
                    return Err(SearchError::Repository {
                        airport: airport.id,
                        source,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
