//! Airport identity, category and location types.

use std::fmt;

use geo::{Distance, Geodesic, Point};

use super::DomainError;

/// Numeric airport identifier, as assigned by the airport registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirportId(pub i64);

impl fmt::Display for AirportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an invalid airport ident.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport ident: {reason}")]
pub struct InvalidIdent {
    reason: &'static str,
}

/// A short textual airport code such as `KJFK`, `EGLL` or `MX-0042`.
///
/// Idents are 1 to 10 characters of uppercase ASCII letters, digits and `-`.
///
/// # Examples
///
/// ```
/// use flight_server::domain::AirportIdent;
///
/// let jfk = AirportIdent::parse("KJFK").unwrap();
/// assert_eq!(jfk.as_str(), "KJFK");
///
/// assert!(AirportIdent::parse("kjfk").is_err());
/// assert!(AirportIdent::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AirportIdent(String);

impl AirportIdent {
    /// Maximum ident length, matching the registry column width.
    pub const MAX_LEN: usize = 10;

    /// Parse an ident from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidIdent> {
        if s.is_empty() {
            return Err(InvalidIdent {
                reason: "must not be empty",
            });
        }

        if s.len() > Self::MAX_LEN {
            return Err(InvalidIdent {
                reason: "must be at most 10 characters",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(InvalidIdent {
                reason: "must be uppercase ASCII letters, digits or '-'",
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Parse an ident, accepting lowercase input and surrounding whitespace.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidIdent> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the ident as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AirportIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportIdent({})", self.0)
    }
}

impl fmt::Display for AirportIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for an unrecognised airport type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown airport category: {0}")]
pub struct InvalidCategory(pub String);

/// Airport category as published by the airport registry.
///
/// Only large and medium airports have scheduled service and take part in
/// route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirportCategory {
    Large,
    Medium,
    Small,
    Heliport,
    SeaplaneBase,
    Balloonport,
    Closed,
}

impl AirportCategory {
    /// Parse a registry type string such as `large_airport`.
    pub fn parse(s: &str) -> Result<Self, InvalidCategory> {
        match s {
            "large_airport" => Ok(Self::Large),
            "medium_airport" => Ok(Self::Medium),
            "small_airport" => Ok(Self::Small),
            "heliport" => Ok(Self::Heliport),
            "seaplane_base" => Ok(Self::SeaplaneBase),
            "balloonport" => Ok(Self::Balloonport),
            "closed" => Ok(Self::Closed),
            other => Err(InvalidCategory(other.to_string())),
        }
    }

    /// Returns the registry type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Large => "large_airport",
            Self::Medium => "medium_airport",
            Self::Small => "small_airport",
            Self::Heliport => "heliport",
            Self::SeaplaneBase => "seaplane_base",
            Self::Balloonport => "balloonport",
            Self::Closed => "closed",
        }
    }

    /// Whether airports of this category are eligible as search nodes.
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::Large | Self::Medium)
    }
}

impl fmt::Display for AirportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    /// Create a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(DomainError::InvalidPosition {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Geodesic distance to another position in kilometres, measured on
    /// the WGS84 ellipsoid.
    pub fn distance_km(&self, other: &Position) -> f64 {
        Geodesic.distance(self.point(), other.point()) / 1000.0
    }

    fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// An airport. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub id: AirportId,
    pub ident: AirportIdent,
    pub category: AirportCategory,
    pub name: String,
    pub position: Position,
    /// Two-letter continent code, if known.
    pub continent: Option<String>,
    /// ISO 3166-1 alpha-2 country code, if known.
    pub iso_country: Option<String>,
}

impl Airport {
    /// Create an airport without country information.
    pub fn new(
        id: AirportId,
        ident: AirportIdent,
        category: AirportCategory,
        name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id,
            ident,
            category,
            name: name.into(),
            position,
            continent: None,
            iso_country: None,
        }
    }

    /// Attach continent and country codes.
    pub fn with_country(mut self, continent: Option<String>, iso_country: Option<String>) -> Self {
        self.continent = continent;
        self.iso_country = iso_country;
        self
    }

    /// Whether this airport is eligible as a search node.
    pub fn is_searchable(&self) -> bool {
        self.category.is_searchable()
    }

    /// Geodesic distance to another airport in kilometres.
    pub fn distance_km(&self, other: &Airport) -> f64 {
        self.position.distance_km(&other.position)
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ident, self.name)
    }
}
