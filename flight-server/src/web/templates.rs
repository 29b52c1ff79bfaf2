//! Askama templates for HTML responses.

use askama::Template;
use chrono::NaiveDate;

use crate::domain::{Itinerary, format_duration, format_timestamp};
use crate::planner::SearchOutcome;

/// Route search result page.
#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ origin }} to {{ destination }}</title>
</head>
<body>
  <h1>{{ origin }} &rarr; {{ destination }}</h1>
  <p class="date">Departing {{ date }}</p>
  {% match status %}
  {% when RouteStatus::Trivial %}
  <p class="notice">Origin and destination are the same airport.</p>
  {% when RouteStatus::NotFound %}
  <p class="notice">No route found on this date.</p>
  {% when RouteStatus::Found %}
  <ol class="itinerary">
    {% for leg in legs %}
    <li>
      {% if !leg.layover.is_empty() %}<p class="layover">Layover {{ leg.layover }} at {{ leg.from }}</p>{% endif %}
      <span class="flight">{{ leg.flight_id }}</span>
      <span class="model">{{ leg.model }}</span>
      <span class="from">{{ leg.from }}</span> {{ leg.departure }}
      &rarr; <span class="to">{{ leg.to }}</span> {{ leg.arrival }}
      <span class="duration">({{ leg.duration }})</span>
    </li>
    {% endfor %}
  </ol>
  <p class="summary">{{ changes }} change(s), total {{ total }}</p>
  {% endmatch %}
</body>
</html>"#
)]
pub struct ItineraryTemplate {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub status: RouteStatus,
    pub legs: Vec<LegView>,
    pub changes: usize,
    pub total: String,
}

/// How a search ended, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    Found,
    NotFound,
    Trivial,
}

/// Leg view model for templates.
#[derive(Debug, Clone)]
pub struct LegView {
    pub flight_id: String,
    pub model: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,

    /// Wait before this flight; empty for the first leg.
    pub layover: String,
}

impl LegView {
    fn from_itinerary(itinerary: &Itinerary) -> Vec<Self> {
        let legs = itinerary.legs();
        legs.iter()
            .enumerate()
            .map(|(i, leg)| {
                let to = legs
                    .get(i + 1)
                    .map(|next| next.airport.to_string())
                    .unwrap_or_else(|| itinerary.destination().to_string());

                let layover = match i.checked_sub(1).and_then(|p| legs.get(p)) {
                    Some(previous) => format_duration(
                        leg.flight.departure_time() - previous.flight.arrival_time(),
                    ),
                    None => String::new(),
                };

                Self {
                    flight_id: leg.flight.id().to_string(),
                    model: leg.flight.model().to_string(),
                    from: leg.airport.to_string(),
                    to,
                    departure: format_timestamp(leg.flight.departure_time()),
                    arrival: format_timestamp(leg.flight.arrival_time()),
                    duration: format_duration(leg.flight.duration()),
                    layover,
                }
            })
            .collect()
    }
}

impl ItineraryTemplate {
    /// Create from a search outcome.
    pub fn from_outcome(origin: &str, date: NaiveDate, outcome: &SearchOutcome) -> Self {
        let (status, legs, changes, total) = match outcome {
            SearchOutcome::Found(itinerary) => (
                RouteStatus::Found,
                LegView::from_itinerary(itinerary),
                itinerary.change_count(),
                format_duration(itinerary.total_duration()),
            ),
            SearchOutcome::NotFound { .. } => (RouteStatus::NotFound, Vec::new(), 0, String::new()),
            SearchOutcome::Trivial { .. } => (RouteStatus::Trivial, Vec::new(), 0, String::new()),
        };

        Self {
            origin: origin.to_string(),
            destination: outcome.destination().to_string(),
            date: date.to_string(),
            status,
            legs,
            changes,
            total,
        }
    }
}
