//! Search configuration for the route planner.

use chrono::Duration;

/// How the remaining-cost estimate is expressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heuristic {
    /// Geodesic kilometres added directly to elapsed seconds.
    ///
    /// Kept for parity with earlier scores. The units do not
    /// match, so the estimate is not a lower bound on remaining time.
    Legacy,

    /// Geodesic distance divided by a cruise speed, in seconds.
    ///
    /// A lower bound on remaining flight time as long as no aircraft in the
    /// schedule flies faster than `cruise_speed_kmh`.
    TravelTime { cruise_speed_kmh: f64 },
}

/// How the first flight out of the origin is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLegCost {
    /// The first flight costs nothing; elapsed time counts from its arrival.
    Free,

    /// Waiting since the reference time plus the first flight's duration.
    SinceReference,
}

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Remaining-cost estimate.
    pub heuristic: Heuristic,

    /// Accounting for the first flight out of the origin.
    pub first_leg_cost: FirstLegCost,

    /// Minimum layover between flights (minutes).
    /// Tighter connections are rejected.
    pub min_connection_mins: i64,

    /// Number of consecutive calendar days of departures considered per
    /// expansion, starting at the day the search reached the airport.
    pub window_days: u32,

    /// Maximum number of airports expanded before giving up.
    pub max_expansions: Option<usize>,

    /// Wall-clock limit for a single search (seconds).
    pub timeout_secs: Option<u64>,

    /// Retries for transient repository failures.
    pub fetch_retries: u32,

    /// Initial backoff between retries (milliseconds), doubled each attempt.
    pub retry_backoff_ms: u64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        heuristic: Heuristic,
        first_leg_cost: FirstLegCost,
        min_connection_mins: i64,
        window_days: u32,
        max_expansions: Option<usize>,
        timeout_secs: Option<u64>,
        fetch_retries: u32,
        retry_backoff_ms: u64,
    ) -> Self {
        Self {
            heuristic,
            first_leg_cost,
            min_connection_mins,
            window_days,
            max_expansions,
            timeout_secs,
            fetch_retries,
            retry_backoff_ms,
        }
    }

    /// Configuration that scores like the legacy kilometre-based planner.
    pub fn legacy() -> Self {
        Self {
            heuristic: Heuristic::Legacy,
            first_leg_cost: FirstLegCost::Free,
            min_connection_mins: 0,
            window_days: 1,
            max_expansions: None,
            timeout_secs: None,
            fetch_retries: 0,
            retry_backoff_ms: 0,
        }
    }

    /// Returns the minimum connection time as a Duration.
    pub fn min_connection(&self) -> Duration {
        Duration::minutes(self.min_connection_mins.max(0))
    }

    /// Returns the number of days per expansion, at least one.
    pub fn window_days(&self) -> u32 {
        self.window_days.max(1)
    }

    /// Returns the search deadline as a std Duration.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }

    /// Backoff before retry number `attempt` (zero-based).
    pub fn retry_backoff(&self, attempt: u32) -> std::time::Duration {
        let factor = 1u64 << attempt.min(16);
        std::time::Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::TravelTime {
                cruise_speed_kmh: 950.0,
            },
            first_leg_cost: FirstLegCost::Free,
            min_connection_mins: 0,
            window_days: 1,
            max_expansions: Some(50_000),
            timeout_secs: None,
            fetch_retries: 2,
            retry_backoff_ms: 50,
        }
    }
}
