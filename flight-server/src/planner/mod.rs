//! Route planner using time-dependent A* search.
//!
//! This module answers: "leaving airport X on day D, what is the quickest
//! sequence of flights to airport Y?"
//!
//! Airports are nodes and scheduled flights are edges, but the graph is
//! never materialised. Departures are fetched from a [`FlightRepository`]
//! as each airport is expanded, for the calendar day the traveller is
//! there. The cost of an edge depends on how the airport was reached, so
//! it is computed from the arriving flight (see [`Provenance`]).

mod config;
mod cost;
mod frontier;
mod reconstruct;
mod search;

pub use config::{FirstLegCost, Heuristic, SearchConfig};
pub use cost::{CostModel, MissedConnection, Provenance, heuristic, real_cost, total_seconds};
pub use frontier::Frontier;
pub use reconstruct::{Predecessors, reconstruct};
pub use search::{
    FlightRepository, Planner, SearchError, SearchOutcome, SearchRequest, SearchResult,
};
