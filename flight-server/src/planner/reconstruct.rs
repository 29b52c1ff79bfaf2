//! Path reconstruction from the predecessor map.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::domain::{Airport, AirportId, Flight, Itinerary, Leg};

use super::search::SearchError;

/// Predecessor map: airport -> (airport it was reached from, flight taken).
pub type Predecessors = HashMap<AirportId, (Arc<Airport>, Flight)>;

/// Walk the predecessor map back from `destination` to `origin` and return
/// the legs in chronological order.
///
/// Failure means the map is inconsistent (a cycle, a missing entry or a
/// chain that does not connect in time); it indicates a defect in the
/// search, not bad user input.
pub fn reconstruct(
    predecessors: &Predecessors,
    origin: &Arc<Airport>,
    destination: &Arc<Airport>,
) -> Result<Itinerary, SearchError> {
    let mut legs = Vec::new();
    let mut cursor = destination.id;

    while cursor != origin.id {
        // Each airport appears at most once on an acyclic chain.
        if legs.len() > predecessors.len() {
            error!(airport = %cursor, "cycle in predecessor map");
            return Err(SearchError::InconsistentPredecessors(cursor));
        }

        let Some((previous, flight)) = predecessors.get(&cursor) else {
            error!(airport = %cursor, "missing predecessor");
            return Err(SearchError::InconsistentPredecessors(cursor));
        };

        legs.push(Leg::new(previous.clone(), flight.clone()));
        cursor = previous.id;
    }

    legs.reverse();

    Itinerary::new(legs, destination.clone()).map_err(|e| {
        error!(error = %e, "reconstructed path is not a valid itinerary");
        SearchError::InconsistentPredecessors(destination.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AirportCategory, AirportIdent, FlightId, Position};
    use chrono::{NaiveDate, NaiveDateTime};

    fn airport(id: i64) -> Arc<Airport> {
        Arc::new(Airport::new(
            AirportId(id),
            AirportIdent::parse(&format!("AP{id}")).unwrap(),
            AirportCategory::Medium,
            format!("Airport {id}"),
            Position::new(0.0, 0.0).unwrap(),
        ))
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn flight(id: &str, from: i64, to: i64, dep: u32, arr: u32) -> Flight {
        Flight::new(
            FlightId::parse(id).unwrap(),
            "A320",
            at(dep),
            at(arr),
            AirportId(from),
            AirportId(to),
        )
        .unwrap()
    }

    #[test]
    fn walks_back_to_origin() {
        let (a, b, c) = (airport(1), airport(2), airport(3));
        let mut predecessors = Predecessors::new();
        predecessors.insert(AirportId(2), (a.clone(), flight("F1", 1, 2, 8, 9)));
        predecessors.insert(AirportId(3), (b.clone(), flight("F2", 2, 3, 10, 12)));

        let itinerary = reconstruct(&predecessors, &a, &c).unwrap();
        let ids: Vec<&str> = itinerary
            .legs()
            .iter()
            .map(|leg| leg.flight.id().as_str())
            .collect();
        assert_eq!(ids, vec!["F1", "F2"]);
        assert_eq!(itinerary.origin().id, AirportId(1));
        assert_eq!(itinerary.destination().id, AirportId(3));
    }

    #[test]
    fn missing_entry_is_error() {
        let (a, c) = (airport(1), airport(3));
        let predecessors = Predecessors::new();
        let result = reconstruct(&predecessors, &a, &c);
        assert!(matches!(
            result,
            Err(SearchError::InconsistentPredecessors(AirportId(3)))
        ));
    }

    #[test]
    fn cycle_is_error() {
        let (a, b, c) = (airport(1), airport(2), airport(3));
        let mut predecessors = Predecessors::new();
        predecessors.insert(AirportId(2), (c.clone(), flight("F1", 3, 2, 8, 9)));
        predecessors.insert(AirportId(3), (b.clone(), flight("F2", 2, 3, 10, 12)));

        let result = reconstruct(&predecessors, &a, &c);
        assert!(matches!(
            result,
            Err(SearchError::InconsistentPredecessors(_))
        ));
    }

    #[test]
    fn chain_out_of_time_order_is_error() {
        let (a, b, c) = (airport(1), airport(2), airport(3));
        let mut predecessors = Predecessors::new();
        predecessors.insert(AirportId(2), (a.clone(), flight("F1", 1, 2, 8, 11)));
        predecessors.insert(AirportId(3), (b.clone(), flight("F2", 2, 3, 10, 12)));

        let result = reconstruct(&predecessors, &a, &c);
        assert!(matches!(
            result,
            Err(SearchError::InconsistentPredecessors(AirportId(3)))
        ));
    }
}
