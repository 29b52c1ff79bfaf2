//! Scheduled flight types.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use super::{AirportId, DomainError};
use super::time::format_timestamp;

/// Error returned when parsing an invalid flight identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid flight id: {reason}")]
pub struct InvalidFlightId {
    reason: &'static str,
}

/// A flight identifier: 1 to 10 uppercase ASCII letters or digits.
///
/// # Examples
///
/// ```
/// use flight_server::domain::FlightId;
///
/// assert!(FlightId::parse("X7K2Q9").is_ok());
/// assert!(FlightId::parse("x7k2q9").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightId(String);

impl FlightId {
    pub const MAX_LEN: usize = 10;

    pub fn parse(s: &str) -> Result<Self, InvalidFlightId> {
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return Err(InvalidFlightId {
                reason: "must be 1 to 10 characters",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidFlightId {
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlightId({})", self.0)
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business and economy fares. Carried for display only; route search
/// ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fares {
    pub business: f64,
    pub economy: f64,
}

/// A single scheduled flight between two airports.
///
/// # Invariants
///
/// - `arrival_time >= departure_time`
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    id: FlightId,
    model: String,
    fares: Fares,
    departure_time: NaiveDateTime,
    arrival_time: NaiveDateTime,
    origin: AirportId,
    destination: AirportId,
}

impl Flight {
    /// Create a flight, rejecting one that lands before it takes off.
    pub fn new(
        id: FlightId,
        model: impl Into<String>,
        departure_time: NaiveDateTime,
        arrival_time: NaiveDateTime,
        origin: AirportId,
        destination: AirportId,
    ) -> Result<Self, DomainError> {
        if arrival_time < departure_time {
            return Err(DomainError::ArrivalBeforeDeparture(id));
        }

        Ok(Self {
            id,
            model: model.into(),
            fares: Fares::default(),
            departure_time,
            arrival_time,
            origin,
            destination,
        })
    }

    /// Attach fares to the flight.
    pub fn with_fares(mut self, fares: Fares) -> Self {
        self.fares = fares;
        self
    }

    pub fn id(&self) -> &FlightId {
        &self.id
    }

    /// Aircraft model, e.g. "Airbus A320neo".
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fares(&self) -> Fares {
        self.fares
    }

    pub fn departure_time(&self) -> NaiveDateTime {
        self.departure_time
    }

    pub fn arrival_time(&self) -> NaiveDateTime {
        self.arrival_time
    }

    /// Airport the flight departs from.
    pub fn origin(&self) -> AirportId {
        self.origin
    }

    /// Airport the flight lands at.
    pub fn destination(&self) -> AirportId {
        self.destination
    }

    /// Time in the air. Never negative.
    pub fn duration(&self) -> Duration {
        self.arrival_time - self.departure_time
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} -> {}, departs {}, arrives {}",
            self.id,
            self.model,
            self.origin,
            self.destination,
            format_timestamp(self.departure_time),
            format_timestamp(self.arrival_time)
        )
    }
}
