//! Unit tests for the time-dependent A* search.

use super::*;
use crate::domain::{AirportCategory, AirportIdent, FlightId, Position, day_bounds};
use crate::planner::{FirstLegCost, Heuristic};
use std::cell::{Cell, RefCell};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, min, 0).unwrap()
}

fn airport(id: i64, ident: &str, lat: f64, lon: f64) -> Arc<Airport> {
    Arc::new(Airport::new(
        AirportId(id),
        AirportIdent::parse(ident).unwrap(),
        AirportCategory::Large,
        format!("{ident} International"),
        Position::new(lat, lon).unwrap(),
    ))
}

fn flight(id: &str, from: &Airport, to: &Airport, dep: NaiveDateTime, arr: NaiveDateTime) -> Flight {
    Flight::new(
        FlightId::parse(id).unwrap(),
        "Airbus A320neo",
        dep,
        arr,
        from.id,
        to.id,
    )
    .unwrap()
}

/// Mock repository for testing.
///
/// Serves a fixed schedule, honouring the one-origin, one-day contract,
/// and records every query.
struct MockRepository {
    airports: HashMap<AirportId, Arc<Airport>>,
    flights: Vec<Flight>,
    queries: RefCell<Vec<(AirportId, NaiveDate)>>,
    transient_failures: Cell<u32>,
    broken: bool,
}

impl MockRepository {
    fn new(airports: &[&Arc<Airport>], flights: Vec<Flight>) -> Self {
        Self {
            airports: airports.iter().map(|a| (a.id, Arc::clone(a))).collect(),
            flights,
            queries: RefCell::new(Vec::new()),
            transient_failures: Cell::new(0),
            broken: false,
        }
    }

    fn failing_transiently(mut self, times: u32) -> Self {
        self.transient_failures = Cell::new(times);
        self
    }

    fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl FlightRepository for MockRepository {
    fn departures(
        &self,
        airport: &Airport,
        day: NaiveDate,
    ) -> Result<Vec<(Flight, Arc<Airport>)>, RepositoryError> {
        self.queries.borrow_mut().push((airport.id, day));

        if self.broken {
            return Err(RepositoryError::UnknownAirport(airport.id));
        }
        let remaining = self.transient_failures.get();
        if remaining > 0 {
            self.transient_failures.set(remaining - 1);
            return Err(RepositoryError::Unavailable("connection reset".into()));
        }

        let (start, end) = day_bounds(day);
        Ok(self
            .flights
            .iter()
            .filter(|f| f.origin() == airport.id)
            .filter(|f| f.departure_time() >= start && f.departure_time() < end)
            .map(|f| (f.clone(), self.airports[&f.destination()].clone()))
            .collect())
    }
}

fn flight_ids(outcome: &SearchOutcome) -> Vec<String> {
    outcome
        .itinerary()
        .map(|it| {
            it.legs()
                .iter()
                .map(|leg| leg.flight.id().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn direct_flight_found() {
    let x = airport(1, "XXXX", 40.0, -74.0);
    let y = airport(2, "YYYY", 42.0, -71.0);
    let repo = MockRepository::new(
        &[&x, &y],
        vec![flight("XY1", &x, &y, at(1, 9, 0), at(1, 10, 15))],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let result = planner
        .search(&SearchRequest::on_date(x.clone(), y.clone(), date(1)))
        .unwrap();

    assert!(result.outcome.is_found());
    assert_eq!(flight_ids(&result.outcome), vec!["XY1"]);
    let itinerary = result.outcome.itinerary().unwrap();
    assert!(itinerary.is_direct());
    assert_eq!(itinerary.origin().id, x.id);
    assert_eq!(itinerary.destination().id, y.id);
    assert_eq!(result.expansions, 1);
    assert_eq!(result.repository_calls, 1);
}

#[test]
fn prefers_direct_over_slower_connection() {
    // Z lies exactly between X and Y, so the per-leg estimates favour
    // neither route; the direct flight arrives a day earlier.
    let x = airport(1, "XXXX", 0.0, 0.0);
    let z = airport(2, "ZZZZ", 0.0, 5.0);
    let y = airport(3, "YYYY", 0.0, 10.0);
    let repo = MockRepository::new(
        &[&x, &y, &z],
        vec![
            flight("XZ1", &x, &z, at(1, 6, 0), at(1, 7, 0)),
            flight("ZY1", &z, &y, at(1, 20, 0), at(2, 9, 0)),
            flight("XY1", &x, &y, at(1, 12, 0), at(1, 14, 0)),
        ],
    );

    for config in [SearchConfig::default(), SearchConfig::legacy()] {
        let planner = Planner::new(&repo, &config);
        let outcome = planner
            .find_path(x.clone(), y.clone(), day_start(date(1)))
            .unwrap();
        assert_eq!(flight_ids(&outcome), vec!["XY1"]);
    }
}

#[test]
fn no_departures_is_not_found_after_first_expansion() {
    let x = airport(1, "XXXX", 0.0, 0.0);
    let y = airport(2, "YYYY", 0.0, 10.0);
    let repo = MockRepository::new(&[&x, &y], vec![]);
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let result = planner
        .search(&SearchRequest::on_date(x.clone(), y.clone(), date(1)))
        .unwrap();

    assert_eq!(
        result.outcome,
        SearchOutcome::NotFound {
            destination: y.clone()
        }
    );
    assert_eq!(result.expansions, 1);
    assert_eq!(repo.query_count(), 1);

    let (legs, destination) = result.outcome.into_parts();
    assert!(legs.is_empty());
    assert_eq!(destination.id, y.id);
}

#[test]
fn same_origin_and_destination_is_trivial() {
    let x = airport(1, "XXXX", 0.0, 0.0);
    let y = airport(2, "YYYY", 0.0, 10.0);
    let repo = MockRepository::new(
        &[&x, &y],
        vec![flight("XY1", &x, &y, at(1, 9, 0), at(1, 10, 0))],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let result = planner
        .search(&SearchRequest::on_date(x.clone(), x.clone(), date(1)))
        .unwrap();

    assert_eq!(
        result.outcome,
        SearchOutcome::Trivial {
            destination: x.clone()
        }
    );
    assert_eq!(repo.query_count(), 0);
    let (legs, destination) = result.outcome.into_parts();
    assert!(legs.is_empty());
    assert_eq!(destination.id, x.id);
}

#[test]
fn unreachable_destination_is_not_found() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let c = airport(3, "CCCC", 0.0, 2.0);
    let d = airport(4, "DDDD", 0.0, 3.0);
    let repo = MockRepository::new(
        &[&a, &b, &c, &d],
        vec![
            flight("AB1", &a, &b, at(1, 8, 0), at(1, 9, 0)),
            flight("BC1", &b, &c, at(1, 10, 0), at(1, 11, 0)),
            flight("CA1", &c, &a, at(1, 12, 0), at(1, 13, 0)),
            flight("DA1", &d, &a, at(1, 8, 0), at(1, 9, 0)),
        ],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let result = planner
        .search(&SearchRequest::on_date(a.clone(), d.clone(), date(1)))
        .unwrap();

    assert!(!result.outcome.is_found());
    assert_eq!(result.expansions, 3);
}

#[test]
fn connection_must_leave_after_arrival() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let c = airport(3, "CCCC", 0.0, 2.0);
    let repo = MockRepository::new(
        &[&a, &b, &c],
        vec![
            flight("AB1", &a, &b, at(1, 8, 0), at(1, 10, 0)),
            // Leaves before AB1 lands.
            flight("BC1", &b, &c, at(1, 9, 0), at(1, 10, 0)),
            flight("BC2", &b, &c, at(1, 15, 0), at(1, 16, 0)),
        ],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let outcome = planner.find_path(a.clone(), c.clone(), at(1, 0, 0)).unwrap();

    assert_eq!(flight_ids(&outcome), vec!["AB1", "BC2"]);
}

#[test]
fn min_connection_time_rejects_tight_layovers() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let c = airport(3, "CCCC", 0.0, 2.0);
    let repo = MockRepository::new(
        &[&a, &b, &c],
        vec![
            flight("AB1", &a, &b, at(1, 8, 0), at(1, 10, 0)),
            flight("BC1", &b, &c, at(1, 10, 20), at(1, 11, 0)),
            flight("BC2", &b, &c, at(1, 11, 30), at(1, 12, 30)),
        ],
    );

    let loose = SearchConfig::default();
    let outcome = Planner::new(&repo, &loose)
        .find_path(a.clone(), c.clone(), at(1, 0, 0))
        .unwrap();
    assert_eq!(flight_ids(&outcome), vec!["AB1", "BC1"]);

    let strict = SearchConfig {
        min_connection_mins: 60,
        ..SearchConfig::default()
    };
    let outcome = Planner::new(&repo, &strict)
        .find_path(a.clone(), c.clone(), at(1, 0, 0))
        .unwrap();
    assert_eq!(flight_ids(&outcome), vec!["AB1", "BC2"]);
}

#[test]
fn lookup_day_follows_arrival() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 60.0);
    let c = airport(3, "CCCC", 0.0, 61.0);
    let repo = MockRepository::new(
        &[&a, &b, &c],
        vec![
            // Overnight: lands on the 2nd.
            flight("AB1", &a, &b, at(1, 22, 0), at(2, 6, 0)),
            flight("BC1", &b, &c, at(2, 8, 0), at(2, 9, 0)),
        ],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let outcome = planner.find_path(a.clone(), c.clone(), at(1, 0, 0)).unwrap();

    assert_eq!(flight_ids(&outcome), vec!["AB1", "BC1"]);
    assert_eq!(
        *repo.queries.borrow(),
        vec![(a.id, date(1)), (b.id, date(2))]
    );
}

#[test]
fn single_day_window_misses_next_day_connection() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let c = airport(3, "CCCC", 0.0, 2.0);
    let repo = MockRepository::new(
        &[&a, &b, &c],
        vec![
            flight("AB1", &a, &b, at(1, 20, 0), at(1, 23, 0)),
            flight("BC1", &b, &c, at(2, 7, 0), at(2, 8, 0)),
        ],
    );

    let one_day = SearchConfig::default();
    let outcome = Planner::new(&repo, &one_day)
        .find_path(a.clone(), c.clone(), at(1, 0, 0))
        .unwrap();
    assert!(!outcome.is_found());

    let two_days = SearchConfig {
        window_days: 2,
        ..SearchConfig::default()
    };
    let outcome = Planner::new(&repo, &two_days)
        .find_path(a.clone(), c.clone(), at(1, 0, 0))
        .unwrap();
    assert_eq!(flight_ids(&outcome), vec!["AB1", "BC1"]);
}

#[test]
fn earlier_arrival_wins_between_connections() {
    // Two ways from A to D; via C reaches D three hours sooner.
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 1.0, 1.0);
    let c = airport(3, "CCCC", -1.0, 1.0);
    let d = airport(4, "DDDD", 0.0, 2.0);
    let repo = MockRepository::new(
        &[&a, &b, &c, &d],
        vec![
            flight("AB1", &a, &b, at(1, 8, 0), at(1, 9, 0)),
            flight("AC1", &a, &c, at(1, 8, 0), at(1, 9, 0)),
            flight("BD1", &b, &d, at(1, 14, 0), at(1, 15, 0)),
            flight("CD1", &c, &d, at(1, 11, 0), at(1, 12, 0)),
        ],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&repo, &config);
    let outcome = planner.find_path(a.clone(), d.clone(), at(1, 0, 0)).unwrap();

    assert_eq!(flight_ids(&outcome), vec!["AC1", "CD1"]);
}

#[test]
fn expanded_airport_keeps_its_connection() {
    // B is expanded via A at 10:00. The instant hop from C later offers B
    // at a lower cost but lands after BD1 has left, so it must not replace
    // the predecessor BD1 was scored against.
    let d = airport(1, "DDDD", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let a = airport(3, "AAAA", 0.0, 1.5);
    let o = airport(4, "OOOO", 0.0, 5.0);
    let c = airport(5, "CCCC", 0.0, 30.0);
    let repo = MockRepository::new(
        &[&d, &b, &a, &o, &c],
        vec![
            flight("OA1", &o, &a, at(1, 6, 0), at(1, 8, 0)),
            flight("OC1", &o, &c, at(1, 6, 0), at(1, 14, 0)),
            flight("AB1", &a, &b, at(1, 9, 0), at(1, 10, 0)),
            flight("BD1", &b, &d, at(1, 13, 0), at(1, 14, 0)),
            flight("CB1", &c, &b, at(1, 14, 0), at(1, 14, 0)),
        ],
    );
    let config = SearchConfig::default();

    let outcome = Planner::new(&repo, &config)
        .find_path(o.clone(), d.clone(), at(1, 0, 0))
        .unwrap();

    assert_eq!(flight_ids(&outcome), vec!["OA1", "AB1", "BD1"]);
}

#[test]
fn since_reference_accounts_for_first_leg() {
    // With a free first leg, a late first flight looks as good as an
    // early one; charging it picks the route that arrives first.
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 0.0);
    let c = airport(3, "CCCC", 0.0, 0.0);
    let repo = MockRepository::new(
        &[&a, &b, &c],
        vec![
            flight("AB1", &a, &b, at(1, 18, 0), at(1, 19, 0)),
            flight("AC1", &a, &c, at(1, 6, 0), at(1, 7, 0)),
            flight("BC1", &b, &c, at(1, 19, 30), at(1, 20, 0)),
        ],
    );

    let config = SearchConfig {
        first_leg_cost: FirstLegCost::SinceReference,
        heuristic: Heuristic::TravelTime {
            cruise_speed_kmh: 950.0,
        },
        ..SearchConfig::default()
    };
    let outcome = Planner::new(&repo, &config)
        .find_path(a.clone(), c.clone(), at(1, 0, 0))
        .unwrap();
    assert_eq!(flight_ids(&outcome), vec!["AC1"]);
}

#[test]
fn repeated_searches_are_deterministic() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 0.0);
    let c = airport(3, "CCCC", 0.0, 0.0);
    let d = airport(4, "DDDD", 0.0, 0.0);
    let repo = MockRepository::new(
        &[&a, &b, &c, &d],
        vec![
            flight("AB1", &a, &b, at(1, 8, 0), at(1, 9, 0)),
            flight("AC1", &a, &c, at(1, 8, 0), at(1, 9, 0)),
            flight("BD1", &b, &d, at(1, 10, 0), at(1, 11, 0)),
            flight("CD1", &c, &d, at(1, 10, 0), at(1, 11, 0)),
        ],
    );
    let config = SearchConfig::default();
    let planner = Planner::new(&repo, &config);

    let first = planner.find_path(a.clone(), d.clone(), at(1, 0, 0)).unwrap();
    for _ in 0..5 {
        let again = planner.find_path(a.clone(), d.clone(), at(1, 0, 0)).unwrap();
        assert_eq!(again, first);
    }
    // Equal cost routes: the one discovered first wins.
    assert_eq!(flight_ids(&first), vec!["AB1", "BD1"]);
}

#[test]
fn transient_failures_are_retried() {
    let x = airport(1, "XXXX", 0.0, 0.0);
    let y = airport(2, "YYYY", 0.0, 1.0);
    let repo = MockRepository::new(
        &[&x, &y],
        vec![flight("XY1", &x, &y, at(1, 9, 0), at(1, 10, 0))],
    )
    .failing_transiently(2);
    let config = SearchConfig {
        fetch_retries: 2,
        retry_backoff_ms: 0,
        ..SearchConfig::default()
    };

    let result = Planner::new(&repo, &config)
        .search(&SearchRequest::on_date(x.clone(), y.clone(), date(1)))
        .unwrap();

    assert!(result.outcome.is_found());
    assert_eq!(result.repository_calls, 3);
}

#[test]
fn retries_are_bounded() {
    let x = airport(1, "XXXX", 0.0, 0.0);
    let y = airport(2, "YYYY", 0.0, 1.0);
    let repo = MockRepository::new(&[&x, &y], vec![]).failing_transiently(5);
    let config = SearchConfig {
        fetch_retries: 1,
        retry_backoff_ms: 0,
        ..SearchConfig::default()
    };

    let result = Planner::new(&repo, &config)
        .search(&SearchRequest::on_date(x.clone(), y.clone(), date(1)));

    assert!(matches!(
        result,
        Err(SearchError::Repository {
            source: RepositoryError::Unavailable(_),
            ..
        })
    ));
    assert_eq!(repo.query_count(), 2);
}

#[test]
fn permanent_failure_is_not_retried() {
    let x = airport(1, "XXXX", 0.0, 0.0);
    let y = airport(2, "YYYY", 0.0, 1.0);
    let repo = MockRepository::new(&[&x, &y], vec![]).broken();
    let config = SearchConfig::default();

    let result = Planner::new(&repo, &config)
        .search(&SearchRequest::on_date(x.clone(), y.clone(), date(1)));

    assert!(matches!(
        result,
        Err(SearchError::Repository { airport, .. }) if airport == x.id
    ));
    assert_eq!(repo.query_count(), 1);
}

#[test]
fn expansion_limit_stops_search() {
    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let c = airport(3, "CCCC", 0.0, 2.0);
    let repo = MockRepository::new(
        &[&a, &b, &c],
        vec![
            flight("AB1", &a, &b, at(1, 8, 0), at(1, 9, 0)),
            flight("BC1", &b, &c, at(1, 10, 0), at(1, 11, 0)),
        ],
    );
    let config = SearchConfig {
        max_expansions: Some(1),
        ..SearchConfig::default()
    };

    let result = Planner::new(&repo, &config)
        .search(&SearchRequest::on_date(a.clone(), c.clone(), date(1)));

    assert!(matches!(result, Err(SearchError::ExpansionLimit(1))));
}

#[test]
fn mismatched_repository_rows_are_ignored() {
    struct Misrouting {
        a: Arc<Airport>,
        b: Arc<Airport>,
    }

    impl FlightRepository for Misrouting {
        fn departures(
            &self,
            _airport: &Airport,
            _day: NaiveDate,
        ) -> Result<Vec<(Flight, Arc<Airport>)>, RepositoryError> {
            // Claims to land at `b` but the flight is recorded to `a`.
            let wrong = flight("BAD1", &self.a, &self.a, at(1, 8, 0), at(1, 9, 0));
            Ok(vec![(wrong, self.b.clone())])
        }
    }

    let a = airport(1, "AAAA", 0.0, 0.0);
    let b = airport(2, "BBBB", 0.0, 1.0);
    let repo = Misrouting {
        a: a.clone(),
        b: b.clone(),
    };
    let config = SearchConfig::default();

    let outcome = Planner::new(&repo, &config)
        .find_path(a.clone(), b.clone(), at(1, 0, 0))
        .unwrap();
    assert!(!outcome.is_found());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Raw flight: (from, to, departure minute from day 1, duration minutes)
    fn schedule() -> impl Strategy<Value = Vec<(i64, i64, i64, i64)>> {
        prop::collection::vec((1i64..=5, 1i64..=5, 0i64..2880, 0i64..600), 0..40)
            .prop_map(|raw| raw.into_iter().filter(|(from, to, _, _)| from != to).collect())
    }

    /// Longitudes for airports 1 to 5, spread out along the equator
    fn positions() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-40.0f64..40.0, 5)
    }

    fn build(raw: &[(i64, i64, i64, i64)]) -> (Vec<Arc<Airport>>, MockRepository) {
        // Co-located airports keep the estimate at zero.
        build_at(raw, &[10.0; 5])
    }

    fn build_at(raw: &[(i64, i64, i64, i64)], longitudes: &[f64]) -> (Vec<Arc<Airport>>, MockRepository) {
        let airports: Vec<Arc<Airport>> = longitudes
            .iter()
            .zip(1..)
            .map(|(lon, id)| airport(id, &format!("AP{id}"), 0.0, *lon))
            .collect();
        let start = day_start(date(1));
        let flights = raw
            .iter()
            .enumerate()
            .map(|(i, (from, to, dep, dur))| {
                let dep = start + Duration::minutes(*dep);
                let arr = dep + Duration::minutes(*dur);
                Flight::new(
                    FlightId::parse(&format!("F{i}")).unwrap(),
                    "Test",
                    dep,
                    arr,
                    AirportId(*from),
                    AirportId(*to),
                )
                .unwrap()
            })
            .collect();
        let refs: Vec<&Arc<Airport>> = airports.iter().collect();
        let repo = MockRepository::new(&refs, flights);
        (airports, repo)
    }

    proptest! {
        /// Any returned itinerary is a valid chain from origin to destination
        #[test]
        fn found_paths_are_valid(raw in schedule()) {
            let (airports, repo) = build(&raw);
            let (origin, destination) = (airports[0].clone(), airports[4].clone());
            let config = SearchConfig::default();
            let reference = day_start(date(1));

            let outcome = Planner::new(&repo, &config)
                .find_path(origin.clone(), destination.clone(), reference)
                .unwrap();

            prop_assert_eq!(outcome.destination().id, destination.id);
            if let Some(itinerary) = outcome.itinerary() {
                let legs = itinerary.legs();
                prop_assert_eq!(legs[0].airport.id, origin.id);
                prop_assert!(legs[0].flight.departure_time() >= reference);
                prop_assert_eq!(legs.last().unwrap().flight.destination(), destination.id);
                for pair in legs.windows(2) {
                    prop_assert!(pair[0].flight.arrival_time() <= pair[1].flight.departure_time());
                    prop_assert_eq!(pair[0].flight.destination(), pair[1].airport.id);
                }
            }
        }

        /// Repeated searches over the same schedule agree
        #[test]
        fn search_is_deterministic(raw in schedule()) {
            let (airports, repo) = build(&raw);
            let config = SearchConfig::default();
            let planner = Planner::new(&repo, &config);
            let reference = day_start(date(1));

            let first = planner.find_path(airports[0].clone(), airports[4].clone(), reference).unwrap();
            let second = planner.find_path(airports[0].clone(), airports[4].clone(), reference).unwrap();
            prop_assert_eq!(first, second);
        }

        /// With a non-zero estimate the search may settle for a slower
        /// route, but never returns a broken one or fails
        #[test]
        fn spread_out_network_yields_valid_paths(raw in schedule(), longitudes in positions()) {
            let (airports, repo) = build_at(&raw, &longitudes);
            let (origin, destination) = (airports[0].clone(), airports[4].clone());
            let reference = day_start(date(1));

            for config in [SearchConfig::default(), SearchConfig::legacy()] {
                let planner = Planner::new(&repo, &config);
                let result = planner.find_path(origin.clone(), destination.clone(), reference);
                prop_assert!(result.is_ok(), "search failed: {:?}", result);
                let outcome = result.unwrap();

                if let Some(itinerary) = outcome.itinerary() {
                    let legs = itinerary.legs();
                    prop_assert_eq!(legs[0].airport.id, origin.id);
                    prop_assert_eq!(itinerary.destination().id, destination.id);
                    for pair in legs.windows(2) {
                        prop_assert!(pair[0].flight.arrival_time() <= pair[1].flight.departure_time());
                        prop_assert_eq!(pair[0].flight.destination(), pair[1].airport.id);
                    }
                }

                let again = planner.find_path(origin.clone(), destination.clone(), reference).unwrap();
                prop_assert_eq!(outcome, again);
            }
        }
    }
}
