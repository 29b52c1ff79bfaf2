//! Domain types for the flight route planner.
//!
//! This module contains the core domain model types that represent
//! validated schedule data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod airport;
mod error;
mod flight;
mod itinerary;
mod time;

pub use airport::{
    Airport, AirportCategory, AirportId, AirportIdent, InvalidCategory, InvalidIdent, Position,
};
pub use error::DomainError;
pub use flight::{Fares, Flight, FlightId, InvalidFlightId};
pub use itinerary::{Itinerary, Leg};
pub use time::{
    DATE_FORMAT, TIMESTAMP_FORMAT, TimeError, day_bounds, day_start, format_duration,
    format_timestamp, parse_date, parse_timestamp,
};
