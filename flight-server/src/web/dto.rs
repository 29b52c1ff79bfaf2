//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Airport, Flight, format_timestamp};
use crate::planner::{SearchOutcome, SearchResult, total_seconds};
use crate::repository::Country;

/// Query for countries on a continent.
#[derive(Debug, Deserialize)]
pub struct CountriesRequest {
    /// Two-letter continent code (required)
    pub continent: Option<String>,
}

/// Query for searchable airports in a country.
#[derive(Debug, Deserialize)]
pub struct AirportsRequest {
    /// ISO country code (required)
    pub iso_country: Option<String>,
}

/// Query for a route search.
///
/// Fields are parsed by hand so that missing and malformed values produce
/// the JSON error body rather than the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    /// Departure airport id
    pub origin_id: Option<String>,

    /// Arrival airport id
    pub destination_id: Option<String>,

    /// Travel date in YYYY-MM-DD format
    pub date: Option<String>,
}

/// A country in listing results.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CountryResult {
    /// ISO 3166-1 alpha-2 code
    pub code: String,

    /// Country name
    pub name: String,
}

/// An airport in listing results.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AirportSummary {
    pub id: i64,
    pub ident: String,
    pub name: String,
}

/// Full airport record.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AirportResult {
    pub id: i64,
    pub ident: String,

    /// Registry type, e.g. "large_airport"
    #[serde(rename = "type")]
    pub category: String,

    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
}

/// Full flight record.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FlightResult {
    pub flight_id: String,

    /// Aircraft model
    pub model: String,

    pub price_business: f64,
    pub price_economy: f64,

    /// Departure time (YYYY-MM-DD HH:MM:SS)
    pub departure_time: String,

    /// Arrival time (YYYY-MM-DD HH:MM:SS)
    pub arrival_time: String,

    pub departure_airport_id: i64,
    pub arrival_airport_id: i64,
}

/// One step of a route: the airport and the flight taken out of it.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PathStep {
    pub airport: AirportResult,
    pub next_flight: FlightResult,
}

/// Response for route search.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathResponse {
    /// "found", "not_found" or "trivial"
    pub outcome: String,

    /// Steps in travel order; empty unless found
    pub path: Vec<PathStep>,

    /// Destination airport
    pub final_airport: AirportResult,

    /// First departure to last arrival, in seconds, when found
    pub total_elapsed_secs: Option<f64>,

    /// Number of airports expanded
    pub expansions: usize,

    /// Number of departure lookups made
    pub repository_calls: usize,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<Country> for CountryResult {
    fn from(country: Country) -> Self {
        Self {
            code: country.code,
            name: country.name,
        }
    }
}

impl From<&Airport> for AirportSummary {
    fn from(airport: &Airport) -> Self {
        Self {
            id: airport.id.0,
            ident: airport.ident.to_string(),
            name: airport.name.clone(),
        }
    }
}

impl From<&Airport> for AirportResult {
    fn from(airport: &Airport) -> Self {
        Self {
            id: airport.id.0,
            ident: airport.ident.to_string(),
            category: airport.category.as_str().to_string(),
            name: airport.name.clone(),
            latitude_deg: airport.position.latitude(),
            longitude_deg: airport.position.longitude(),
            continent: airport.continent.clone(),
            iso_country: airport.iso_country.clone(),
        }
    }
}

impl From<&Flight> for FlightResult {
    fn from(flight: &Flight) -> Self {
        let fares = flight.fares();
        Self {
            flight_id: flight.id().to_string(),
            model: flight.model().to_string(),
            price_business: fares.business,
            price_economy: fares.economy,
            departure_time: format_timestamp(flight.departure_time()),
            arrival_time: format_timestamp(flight.arrival_time()),
            departure_airport_id: flight.origin().0,
            arrival_airport_id: flight.destination().0,
        }
    }
}

impl PathResponse {
    /// Create from a search result.
    pub fn from_result(result: &SearchResult) -> Self {
        let outcome = match &result.outcome {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::NotFound { .. } => "not_found",
            SearchOutcome::Trivial { .. } => "trivial",
        };

        let path = result
            .outcome
            .itinerary()
            .map(|itinerary| {
                itinerary
                    .legs()
                    .iter()
                    .map(|leg| PathStep {
                        airport: AirportResult::from(leg.airport.as_ref()),
                        next_flight: FlightResult::from(&leg.flight),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            outcome: outcome.to_string(),
            path,
            final_airport: AirportResult::from(result.outcome.destination().as_ref()),
            total_elapsed_secs: result
                .outcome
                .itinerary()
                .map(|itinerary| total_seconds(itinerary.total_duration())),
            expansions: result.expansions,
            repository_calls: result.repository_calls,
        }
    }
}
