//! Cost model for the time-dependent search.
//!
//! The real cost (g) of reaching an airport is elapsed time. The estimate
//! (h) of the remaining cost is derived from the geodesic distance to
//! the destination.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{Airport, Flight, FlightId};

use super::config::{FirstLegCost, Heuristic, SearchConfig};

/// How the search arrived at an airport.
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    /// Still at the origin, not yet departed. Carries the reference time.
    Reference(NaiveDateTime),

    /// Arrived on this flight.
    Arrived(Flight),
}

impl Provenance {
    /// The moment the traveller is available at the airport.
    pub fn clock(&self) -> NaiveDateTime {
        match self {
            Provenance::Reference(t) => *t,
            Provenance::Arrived(flight) => flight.arrival_time(),
        }
    }

    /// Calendar day whose departures are considered next.
    pub fn lookup_day(&self) -> NaiveDate {
        self.clock().date()
    }
}

/// A flight that cannot be boarded from the current provenance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("flight {flight} leaves {layover_mins} min after arrival, minimum is {min_mins} min")]
pub struct MissedConnection {
    pub flight: FlightId,
    pub layover_mins: i64,
    pub min_mins: i64,
}

/// Geodesic distance between two airports in kilometres.
pub fn heuristic(a: &Airport, b: &Airport) -> f64 {
    a.distance_km(b)
}

/// Cost of taking `next` from an airport reached via `provenance`, with
/// default accounting: the first flight out of the origin is free, later
/// flights cost layover plus flight time.
pub fn real_cost(provenance: &Provenance, next: &Flight) -> Result<Duration, MissedConnection> {
    CostModel::new(&SearchConfig::default()).edge_cost(provenance, next)
}

/// Cost model parameterised by search configuration.
#[derive(Debug, Clone)]
pub struct CostModel {
    heuristic: Heuristic,
    first_leg: FirstLegCost,
    min_connection: Duration,
}

impl CostModel {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            heuristic: config.heuristic,
            first_leg: config.first_leg_cost,
            min_connection: config.min_connection(),
        }
    }

    /// Estimate of the remaining cost from `from` to `to`, in the units
    /// added to g seconds when forming f.
    pub fn estimate(&self, from: &Airport, to: &Airport) -> f64 {
        let km = heuristic(from, to);
        match self.heuristic {
            Heuristic::Legacy => km,
            Heuristic::TravelTime { cruise_speed_kmh } => km / cruise_speed_kmh * 3600.0,
        }
    }

    /// Total estimated cost `f = g + h` with g expressed in seconds.
    pub fn score(&self, g: Duration, from: &Airport, to: &Airport) -> f64 {
        total_seconds(g) + self.estimate(from, to)
    }

    /// Real cost of extending a path by `next`.
    ///
    /// Layovers below the minimum connection time (and in particular any
    /// flight that leaves before the previous one lands) are rejected.
    pub fn edge_cost(
        &self,
        provenance: &Provenance,
        next: &Flight,
    ) -> Result<Duration, MissedConnection> {
        match provenance {
            Provenance::Reference(reference) => match self.first_leg {
                FirstLegCost::Free => Ok(Duration::zero()),
                FirstLegCost::SinceReference => {
                    let wait = next.departure_time() - *reference;
                    if wait < Duration::zero() {
                        return Err(self.missed(next, wait, Duration::zero()));
                    }
                    Ok(wait + next.duration())
                }
            },
            Provenance::Arrived(previous) => {
                let layover = next.departure_time() - previous.arrival_time();
                if layover < self.min_connection {
                    return Err(self.missed(next, layover, self.min_connection));
                }
                Ok(layover + next.duration())
            }
        }
    }

    fn missed(&self, next: &Flight, layover: Duration, min: Duration) -> MissedConnection {
        MissedConnection {
            flight: next.id().clone(),
            layover_mins: layover.num_minutes(),
            min_mins: min.num_minutes(),
        }
    }
}

/// Duration in fractional seconds.
pub fn total_seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}
