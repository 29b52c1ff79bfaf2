//! Flight storage.
//!
//! [`SqliteRepository`] is the production [`FlightRepository`]; the
//! importer fills it from CSV exports.
//!
//! [`FlightRepository`]: crate::planner::FlightRepository

mod error;
pub mod import;
mod sqlite;

pub use error::RepositoryError;
pub use import::{ImportSummary, Tally, import_dir};
pub use sqlite::{Country, SqliteRepository};
