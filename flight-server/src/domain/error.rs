//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from storage/IO errors.

use super::{AirportId, FlightId};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude/longitude outside the valid range or not finite
    #[error("invalid position: latitude {latitude}, longitude {longitude}")]
    InvalidPosition { latitude: f64, longitude: f64 },

    /// A flight that lands before it takes off
    #[error("flight {0} arrives before it departs")]
    ArrivalBeforeDeparture(FlightId),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// A leg's flight does not depart from the leg's airport
    #[error("flight {flight} does not depart from airport {airport}")]
    LegOriginMismatch { flight: FlightId, airport: AirportId },

    /// Consecutive legs don't share an airport
    #[error("legs do not connect: arrived at {arrived}, next leg departs {departs}")]
    Disconnected { arrived: AirportId, departs: AirportId },

    /// Next flight departs before the previous one lands
    #[error("flight {next} departs before flight {previous} arrives")]
    Overlapping { previous: FlightId, next: FlightId },

    /// Final leg lands somewhere other than the destination
    #[error("itinerary ends at {arrived}, expected {destination}")]
    WrongDestination {
        arrived: AirportId,
        destination: AirportId,
    },
}
