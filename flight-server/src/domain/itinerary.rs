//! Itinerary types.
//!
//! An `Itinerary` is the answer to a route search: the ordered flights
//! taken from the origin, plus the destination they end at.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use super::time::{format_duration, format_timestamp};
use super::{Airport, DomainError, Flight};

/// One leg of an itinerary: the airport departed from and the flight taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub airport: Arc<Airport>,
    pub flight: Flight,
}

impl Leg {
    pub fn new(airport: Arc<Airport>, flight: Flight) -> Self {
        Self { airport, flight }
    }
}

/// A complete route from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Each leg's flight departs from the leg's airport
/// - Consecutive legs connect: a flight lands where the next one departs,
///   no later than that departure
/// - The last flight lands at the destination
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<Leg>,
    destination: Arc<Airport>,
}

impl Itinerary {
    /// Constructs an itinerary from legs in chronological order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any invariant above is violated.
    pub fn new(legs: Vec<Leg>, destination: Arc<Airport>) -> Result<Self, DomainError> {
        let last = legs.last().ok_or(DomainError::EmptyItinerary)?;

        for leg in &legs {
            if leg.flight.origin() != leg.airport.id {
                return Err(DomainError::LegOriginMismatch {
                    flight: leg.flight.id().clone(),
                    airport: leg.airport.id,
                });
            }
        }

        for window in legs.windows(2) {
            let (prev, next) = (&window[0].flight, &window[1].flight);
            if prev.destination() != next.origin() {
                return Err(DomainError::Disconnected {
                    arrived: prev.destination(),
                    departs: next.origin(),
                });
            }
            if prev.arrival_time() > next.departure_time() {
                return Err(DomainError::Overlapping {
                    previous: prev.id().clone(),
                    next: next.id().clone(),
                });
            }
        }

        if last.flight.destination() != destination.id {
            return Err(DomainError::WrongDestination {
                arrived: last.flight.destination(),
                destination: destination.id,
            });
        }

        Ok(Self { legs, destination })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the number of flights taken.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the number of changes (legs - 1).
    pub fn change_count(&self) -> usize {
        self.legs.len() - 1
    }

    /// Returns true if this is a single-flight itinerary.
    pub fn is_direct(&self) -> bool {
        self.legs.len() == 1
    }

    /// Returns the origin airport.
    pub fn origin(&self) -> &Arc<Airport> {
        // Safe: validated non-empty at construction
        &self.legs.first().unwrap().airport
    }

    /// Returns the destination airport.
    pub fn destination(&self) -> &Arc<Airport> {
        &self.destination
    }

    /// Departure time of the first flight.
    pub fn departure_time(&self) -> NaiveDateTime {
        self.legs.first().unwrap().flight.departure_time()
    }

    /// Arrival time of the last flight.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.legs.last().unwrap().flight.arrival_time()
    }

    /// Elapsed time from first departure to final arrival.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time() - self.departure_time()
    }

    /// Total time spent in the air.
    pub fn flight_duration(&self) -> Duration {
        self.legs.iter().map(|leg| leg.flight.duration()).sum()
    }

    /// Total time spent waiting between flights.
    pub fn layover_duration(&self) -> Duration {
        self.total_duration() - self.flight_duration()
    }

    /// Splits into the `(airport, flight)` pairs and the destination.
    pub fn into_parts(self) -> (Vec<(Arc<Airport>, Flight)>, Arc<Airport>) {
        let pairs = self
            .legs
            .into_iter()
            .map(|leg| (leg.airport, leg.flight))
            .collect();
        (pairs, self.destination)
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, leg) in self.legs.iter().enumerate() {
            writeln!(
                f,
                "{}. {} {} -> {} ({}, {})",
                i + 1,
                leg.flight.id(),
                leg.airport,
                format_timestamp(leg.flight.departure_time()),
                format_timestamp(leg.flight.arrival_time()),
                format_duration(leg.flight.duration()),
            )?;
        }
        write!(
            f,
            "Final destination: {} (total {})",
            self.destination,
            format_duration(self.total_duration())
        )
    }
}
