//! SQLite-backed flight store.
//!
//! Holds the airport registry, the country list and the flight schedule.
//! One `SqliteRepository` is one session: it owns a connection and an
//! identity map, so an airport loaded twice during a search is the same
//! `Arc`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, warn};

use crate::domain::{
    Airport, AirportCategory, AirportId, AirportIdent, Fares, Flight, FlightId, Position,
    day_bounds, format_timestamp, parse_timestamp,
};
use crate::planner::FlightRepository;

use super::RepositoryError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    continent TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS airports (
    id INTEGER PRIMARY KEY,
    ident TEXT NOT NULL UNIQUE,
    type TEXT NOT NULL,
    name TEXT NOT NULL,
    latitude_deg REAL NOT NULL,
    longitude_deg REAL NOT NULL,
    continent TEXT,
    iso_country TEXT
);

CREATE TABLE IF NOT EXISTS flights (
    flight_id TEXT PRIMARY KEY,
    model TEXT NOT NULL,
    price_business REAL,
    price_economy REAL,
    departure_time TEXT NOT NULL,
    arrival_time TEXT NOT NULL,
    departure_airport_id INTEGER NOT NULL REFERENCES airports(id),
    arrival_airport_id INTEGER NOT NULL REFERENCES airports(id)
);

CREATE INDEX IF NOT EXISTS flights_by_departure
    ON flights (departure_airport_id, departure_time);
";

const AIRPORT_COLUMNS: &str =
    "id, ident, type, name, latitude_deg, longitude_deg, continent, iso_country";

/// How long a query waits on a locked database before failing as busy.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A country from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
    /// Two-letter continent code.
    pub continent: String,
}

/// Flight store on a single SQLite connection.
pub struct SqliteRepository {
    conn: Connection,
    airports: RefCell<HashMap<AirportId, Arc<Airport>>>,
}

impl SqliteRepository {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            airports: RefCell::new(HashMap::new()),
        })
    }

    /// Create tables and indexes if they do not exist.
    pub fn init_schema(&self) -> Result<(), RepositoryError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Look up an airport by id.
    pub fn airport(&self, id: AirportId) -> Result<Option<Arc<Airport>>, RepositoryError> {
        if let Some(known) = self.airports.borrow().get(&id) {
            return Ok(Some(known.clone()));
        }

        let sql = format!("SELECT {AIRPORT_COLUMNS} FROM airports WHERE id = ?1");
        let airport = self
            .conn
            .prepare_cached(&sql)?
            .query_row([id.0], |row| read_airport(row, 0))
            .optional()?;

        Ok(airport.map(|a| self.intern(a)))
    }

    /// Large and medium airports, optionally restricted to one country,
    /// ordered by name.
    pub fn searchable_airports(
        &self,
        iso_country: Option<&str>,
    ) -> Result<Vec<Arc<Airport>>, RepositoryError> {
        let sql = format!(
            "SELECT {AIRPORT_COLUMNS} FROM airports
             WHERE type IN ('large_airport', 'medium_airport')
               AND (?1 IS NULL OR iso_country = ?1)
             ORDER BY name, id"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let airports = stmt
            .query_map([iso_country], |row| read_airport(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(airports.into_iter().map(|a| self.intern(a)).collect())
    }

    /// Distinct continent codes that have at least one country.
    pub fn continents(&self) -> Result<Vec<String>, RepositoryError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT DISTINCT continent FROM countries ORDER BY continent")?;
        let continents = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(continents)
    }

    /// Countries on a continent, ordered by name.
    pub fn countries(&self, continent: &str) -> Result<Vec<Country>, RepositoryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, code, name, continent FROM countries
             WHERE continent = ?1 ORDER BY name",
        )?;
        let countries = stmt
            .query_map([continent], |row| {
                Ok(Country {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                    continent: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(countries)
    }

    /// Number of stored flights.
    pub fn flight_count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flights", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Insert or update a country, keyed by id.
    pub fn insert_country(&self, country: &Country) -> Result<(), RepositoryError> {
        self.conn
            .prepare_cached(
                "INSERT INTO countries (id, code, name, continent) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     code = excluded.code, name = excluded.name, continent = excluded.continent",
            )?
            .execute(params![
                country.id,
                country.code,
                country.name,
                country.continent
            ])?;
        Ok(())
    }

    /// Insert or update an airport, keyed by id.
    pub fn insert_airport(&self, airport: &Airport) -> Result<(), RepositoryError> {
        self.conn
            .prepare_cached(
                "INSERT INTO airports (id, ident, type, name, latitude_deg, longitude_deg,
                                       continent, iso_country)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                     ident = excluded.ident, type = excluded.type, name = excluded.name,
                     latitude_deg = excluded.latitude_deg,
                     longitude_deg = excluded.longitude_deg,
                     continent = excluded.continent, iso_country = excluded.iso_country",
            )?
            .execute(params![
                airport.id.0,
                airport.ident.as_str(),
                airport.category.as_str(),
                airport.name,
                airport.position.latitude(),
                airport.position.longitude(),
                airport.continent,
                airport.iso_country,
            ])?;
        self.airports.borrow_mut().remove(&airport.id);
        Ok(())
    }

    /// Insert or update a flight, keyed by flight id. Both airports must
    /// already be stored.
    pub fn insert_flight(&self, flight: &Flight) -> Result<(), RepositoryError> {
        for id in [flight.origin(), flight.destination()] {
            if !self.airport_exists(id)? {
                return Err(RepositoryError::UnknownAirport(id));
            }
        }

        let fares = flight.fares();
        self.conn
            .prepare_cached(
                "INSERT INTO flights (flight_id, model, price_business, price_economy,
                                      departure_time, arrival_time,
                                      departure_airport_id, arrival_airport_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(flight_id) DO UPDATE SET
                     model = excluded.model,
                     price_business = excluded.price_business,
                     price_economy = excluded.price_economy,
                     departure_time = excluded.departure_time,
                     arrival_time = excluded.arrival_time,
                     departure_airport_id = excluded.departure_airport_id,
                     arrival_airport_id = excluded.arrival_airport_id",
            )?
            .execute(params![
                flight.id().as_str(),
                flight.model(),
                fares.business,
                fares.economy,
                format_timestamp(flight.departure_time()),
                format_timestamp(flight.arrival_time()),
                flight.origin().0,
                flight.destination().0,
            ])?;
        Ok(())
    }

    /// Whether an airport id is stored.
    pub fn airport_exists(&self, id: AirportId) -> Result<bool, RepositoryError> {
        if self.airports.borrow().contains_key(&id) {
            return Ok(true);
        }
        let exists = self
            .conn
            .prepare_cached("SELECT 1 FROM airports WHERE id = ?1")?
            .exists([id.0])?;
        Ok(exists)
    }

    fn intern(&self, airport: Airport) -> Arc<Airport> {
        self.airports
            .borrow_mut()
            .entry(airport.id)
            .or_insert_with(|| Arc::new(airport))
            .clone()
    }
}

impl FlightRepository for SqliteRepository {
    fn departures(
        &self,
        airport: &Airport,
        day: NaiveDate,
    ) -> Result<Vec<(Flight, Arc<Airport>)>, RepositoryError> {
        let (start, end) = day_bounds(day);

        let sql = format!(
            "SELECT f.flight_id, f.model, f.price_business, f.price_economy,
                    f.departure_time, f.arrival_time,
                    f.departure_airport_id, f.arrival_airport_id,
                    {columns}
             FROM flights f
             JOIN airports a ON a.id = f.arrival_airport_id
             WHERE f.departure_airport_id = ?1
               AND f.departure_time >= ?2
               AND f.departure_time < ?3
             ORDER BY f.departure_time, f.flight_id",
            columns = AIRPORT_COLUMNS
                .split(", ")
                .map(|c| format!("a.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(
                params![airport.id.0, format_timestamp(start), format_timestamp(end)],
                |row| Ok((FlightRow::read(row)?, read_airport(row, FlightRow::COLUMNS)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let mut departures = Vec::with_capacity(rows.len());
        for (raw, neighbor) in rows {
            let flight_id = raw.flight_id.clone();
            match raw.into_flight() {
                Ok(flight) => departures.push((flight, self.intern(neighbor))),
                Err(reason) => {
                    warn!(flight = %flight_id, %reason, "skipping malformed stored flight");
                }
            }
        }

        debug!(airport = %airport.ident, %day, count = departures.len(), "loaded departures");
        Ok(departures)
    }
}

/// Flight columns as stored, before validation.
struct FlightRow {
    flight_id: String,
    model: String,
    price_business: Option<f64>,
    price_economy: Option<f64>,
    departure_time: String,
    arrival_time: String,
    origin: i64,
    destination: i64,
}

impl FlightRow {
    const COLUMNS: usize = 8;

    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            flight_id: row.get(0)?,
            model: row.get(1)?,
            price_business: row.get(2)?,
            price_economy: row.get(3)?,
            departure_time: row.get(4)?,
            arrival_time: row.get(5)?,
            origin: row.get(6)?,
            destination: row.get(7)?,
        })
    }

    fn into_flight(self) -> Result<Flight, String> {
        let id = FlightId::parse(&self.flight_id).map_err(|e| e.to_string())?;
        let departure = parse_timestamp(&self.departure_time).map_err(|e| e.to_string())?;
        let arrival = parse_timestamp(&self.arrival_time).map_err(|e| e.to_string())?;

        let flight = Flight::new(
            id,
            self.model,
            departure,
            arrival,
            AirportId(self.origin),
            AirportId(self.destination),
        )
        .map_err(|e| e.to_string())?;

        Ok(flight.with_fares(Fares {
            business: self.price_business.unwrap_or_default(),
            economy: self.price_economy.unwrap_or_default(),
        }))
    }
}

/// Read an airport from `AIRPORT_COLUMNS` starting at column `offset`.
fn read_airport(row: &Row<'_>, offset: usize) -> rusqlite::Result<Airport> {
    let id: i64 = row.get(offset)?;

    let ident: String = row.get(offset + 1)?;
    let ident =
        AirportIdent::parse_normalized(&ident).map_err(|e| conversion_error(offset + 1, e))?;

    let category: String = row.get(offset + 2)?;
    let category = AirportCategory::parse(&category).map_err(|e| conversion_error(offset + 2, e))?;

    let name: String = row.get(offset + 3)?;

    let position = Position::new(row.get(offset + 4)?, row.get(offset + 5)?)
        .map_err(|e| conversion_error(offset + 4, e))?;

    Ok(
        Airport::new(AirportId(id), ident, category, name, position)
            .with_country(row.get(offset + 6)?, row.get(offset + 7)?),
    )
}

fn conversion_error<E>(column: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}
