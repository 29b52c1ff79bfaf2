//! CSV population of the flight store.
//!
//! Reads registry-style CSV exports: `countries.csv`, `airports.csv` and
//! `flights.csv`. Columns are matched by header name, so extra columns are
//! ignored. Rows that fail validation are logged and skipped; malformed
//! CSV or I/O failure aborts the whole import.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{
    Airport, AirportCategory, AirportId, AirportIdent, Fares, Flight, FlightId, Position,
    parse_timestamp,
};

use super::{Country, RepositoryError, SqliteRepository};

pub const COUNTRIES_FILE: &str = "countries.csv";
pub const AIRPORTS_FILE: &str = "airports.csv";
pub const FLIGHTS_FILE: &str = "flights.csv";

/// Rows imported and rejected from one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub imported: usize,
    pub rejected: usize,
}

/// Counts from [`import_dir`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub countries: Tally,
    pub airports: Tally,
    pub flights: Tally,
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    id: i64,
    code: String,
    name: String,
    continent: String,
}

#[derive(Debug, Deserialize)]
struct AirportRecord {
    id: i64,
    ident: String,
    #[serde(rename = "type")]
    category: String,
    name: String,
    latitude_deg: f64,
    longitude_deg: f64,
    #[serde(default)]
    continent: Option<String>,
    #[serde(default)]
    iso_country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlightRecord {
    flight_id: String,
    model: String,
    #[serde(default)]
    price_business: Option<f64>,
    #[serde(default)]
    price_economy: Option<f64>,
    departure_time: String,
    arrival_time: String,
    departure_airport_id: i64,
    arrival_airport_id: i64,
}

/// Import every known file present in `dir`, in dependency order, inside
/// one transaction.
pub fn import_dir(repo: &SqliteRepository, dir: &Path) -> Result<ImportSummary, RepositoryError> {
    let tx = repo.connection().unchecked_transaction()?;
    let mut summary = ImportSummary::default();

    if let Some(file) = open_optional(dir, COUNTRIES_FILE)? {
        summary.countries = import_countries(repo, file)?;
    }
    if let Some(file) = open_optional(dir, AIRPORTS_FILE)? {
        summary.airports = import_airports(repo, file)?;
    }
    if let Some(file) = open_optional(dir, FLIGHTS_FILE)? {
        summary.flights = import_flights(repo, file)?;
    }

    tx.commit()?;

    info!(
        countries = summary.countries.imported,
        airports = summary.airports.imported,
        flights = summary.flights.imported,
        rejected = summary.countries.rejected + summary.airports.rejected + summary.flights.rejected,
        dir = %dir.display(),
        "import finished"
    );
    Ok(summary)
}

fn open_optional(dir: &Path, name: &str) -> Result<Option<File>, RepositoryError> {
    let path = dir.join(name);
    if !path.exists() {
        warn!(path = %path.display(), "import file not found, skipping");
        return Ok(None);
    }
    Ok(Some(File::open(path)?))
}

/// Import countries from CSV with columns `id,code,name,continent`.
pub fn import_countries(
    repo: &SqliteRepository,
    input: impl Read,
) -> Result<Tally, RepositoryError> {
    import_records(input, |record: CountryRecord, _line| {
        repo.insert_country(&Country {
            id: record.id,
            code: record.code,
            name: record.name,
            continent: record.continent,
        })
    })
}

/// Import airports from CSV with columns
/// `id,ident,type,name,latitude_deg,longitude_deg[,continent,iso_country]`.
pub fn import_airports(
    repo: &SqliteRepository,
    input: impl Read,
) -> Result<Tally, RepositoryError> {
    import_records(input, |record: AirportRecord, line| {
        let airport = airport_from_record(record, line)?;
        repo.insert_airport(&airport)
    })
}

/// Import flights from CSV with columns `flight_id,model,price_business,
/// price_economy,departure_time,arrival_time,departure_airport_id,
/// arrival_airport_id`. Both airports must already be stored.
pub fn import_flights(repo: &SqliteRepository, input: impl Read) -> Result<Tally, RepositoryError> {
    import_records(input, |record: FlightRecord, line| {
        let flight = flight_from_record(record, line)?;
        repo.insert_flight(&flight).map_err(|e| match e {
            RepositoryError::UnknownAirport(id) => {
                RepositoryError::invalid(line, format!("unknown airport {id}"))
            }
            other => other,
        })
    })
}

/// Deserialize each row and hand it to `store`.
///
/// `InvalidRecord` errors from a row are logged and counted; any other
/// error aborts.
fn import_records<T, F>(input: impl Read, mut store: F) -> Result<Tally, RepositoryError>
where
    T: for<'de> Deserialize<'de>,
    F: FnMut(T, u64) -> Result<(), RepositoryError>,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = reader.headers()?.clone();
    let mut tally = Tally::default();

    for raw in reader.records() {
        let raw = raw?;
        let line = raw.position().map_or(0, |p| p.line());

        let result = raw
            .deserialize::<T>(Some(&headers))
            .map_err(|e| RepositoryError::invalid(line, e.to_string()))
            .and_then(|record| store(record, line));

        match result {
            Ok(()) => tally.imported += 1,
            Err(e @ RepositoryError::InvalidRecord { .. }) => {
                warn!(error = %e, "rejected record");
                tally.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(tally)
}

fn airport_from_record(record: AirportRecord, line: u64) -> Result<Airport, RepositoryError> {
    let invalid = |e: &dyn std::fmt::Display| RepositoryError::invalid(line, e.to_string());

    let ident = AirportIdent::parse_normalized(&record.ident).map_err(|e| invalid(&e))?;
    let category = AirportCategory::parse(&record.category).map_err(|e| invalid(&e))?;
    let position =
        Position::new(record.latitude_deg, record.longitude_deg).map_err(|e| invalid(&e))?;

    Ok(
        Airport::new(AirportId(record.id), ident, category, record.name, position)
            .with_country(record.continent, record.iso_country),
    )
}

fn flight_from_record(record: FlightRecord, line: u64) -> Result<Flight, RepositoryError> {
    let invalid = |e: &dyn std::fmt::Display| RepositoryError::invalid(line, e.to_string());

    let id = FlightId::parse(&record.flight_id).map_err(|e| invalid(&e))?;
    let departure = parse_timestamp(&record.departure_time).map_err(|e| invalid(&e))?;
    let arrival = parse_timestamp(&record.arrival_time).map_err(|e| invalid(&e))?;

    let flight = Flight::new(
        id,
        record.model,
        departure,
        arrival,
        AirportId(record.departure_airport_id),
        AirportId(record.arrival_airport_id),
    )
    .map_err(|e| invalid(&e))?;

    Ok(flight.with_fares(Fares {
        business: record.price_business.unwrap_or_default(),
        economy: record.price_economy.unwrap_or_default(),
    }))
}
