//! HTTP route handlers.

use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::{debug, error, info};

use crate::cache::CachedRepository;
use crate::domain::{Airport, AirportId, parse_date};
use crate::planner::{Planner, SearchError, SearchRequest};
use crate::repository::{RepositoryError, SqliteRepository};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/continents", get(list_continents))
        .route("/api/countries", get(list_countries))
        .route("/api/airports", get(list_airports))
        .route("/api/path", get(find_path))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Distinct continent codes.
async fn list_continents(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let continents = with_repository(&state, |repo, _| Ok(repo.continents()?)).await?;
    Ok(Json(continents))
}

/// Countries on a continent.
async fn list_countries(
    State(state): State<AppState>,
    Query(req): Query<CountriesRequest>,
) -> Result<Json<Vec<CountryResult>>, AppError> {
    let continent = required(req.continent).ok_or_else(|| AppError::BadRequest {
        message: "'continent' parameter is required".to_string(),
    })?;

    let countries = with_repository(&state, move |repo, _| Ok(repo.countries(&continent)?)).await?;
    Ok(Json(countries.into_iter().map(CountryResult::from).collect()))
}

/// Large and medium airports in a country.
async fn list_airports(
    State(state): State<AppState>,
    Query(req): Query<AirportsRequest>,
) -> Result<Json<Vec<AirportSummary>>, AppError> {
    let country = required(req.iso_country).ok_or_else(|| AppError::BadRequest {
        message: "'iso_country' parameter is required".to_string(),
    })?;

    let airports =
        with_repository(&state, move |repo, _| Ok(repo.searchable_airports(Some(&country))?))
            .await?;
    Ok(Json(
        airports
            .iter()
            .map(|a| AirportSummary::from(a.as_ref()))
            .collect(),
    ))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Find the quickest route between two airports on a date.
async fn find_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<PathRequest>,
) -> Result<Response, AppError> {
    let (Some(origin_id), Some(destination_id), Some(date)) = (
        required(req.origin_id),
        required(req.destination_id),
        required(req.date),
    ) else {
        return Err(AppError::BadRequest {
            message: "origin_id, destination_id, and date parameters are required".to_string(),
        });
    };

    let origin_id = parse_airport_id(&origin_id)?;
    let destination_id = parse_airport_id(&destination_id)?;
    let date = parse_date(&date).map_err(|_| AppError::BadRequest {
        message: "Invalid date format. Use YYYY-MM-DD.".to_string(),
    })?;

    let (origin, result) = with_repository(&state, move |repo, state| {
        let origin = lookup_airport(repo, origin_id)?;
        let destination = lookup_airport(repo, destination_id)?;

        let cached = CachedRepository::new(repo, &state.cache);
        let planner = Planner::new(&cached, &state.config);
        let result = planner.search(&SearchRequest::on_date(origin.clone(), destination, date))?;
        Ok((origin, result))
    })
    .await?;

    info!(
        origin = %origin.ident,
        destination = %result.outcome.destination().ident,
        %date,
        found = result.outcome.is_found(),
        expansions = result.expansions,
        repository_calls = result.repository_calls,
        "route search finished"
    );
    if let Some(itinerary) = result.outcome.itinerary() {
        debug!("\n{itinerary}");
    }

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = ItineraryTemplate::from_outcome(&origin.to_string(), date, &result.outcome);
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(PathResponse::from_result(&result)).into_response())
    }
}

/// Treat an empty query value as missing.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_airport_id(raw: &str) -> Result<AirportId, AppError> {
    raw.trim()
        .parse()
        .map(AirportId)
        .map_err(|_| AppError::BadRequest {
            message: format!("Invalid airport id: {raw}"),
        })
}

fn lookup_airport(repo: &SqliteRepository, id: AirportId) -> Result<Arc<Airport>, AppError> {
    repo.airport(id)?.ok_or_else(|| AppError::NotFound {
        message: format!("Unknown airport id: {id}"),
    })
}

/// Run `f` against a fresh database session on the blocking pool.
async fn with_repository<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&SqliteRepository, &AppState) -> Result<T, AppError> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let repo = SqliteRepository::open(state.db_path.as_ref())?;
        f(&repo, &state)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Request task failed: {e}"),
    })?
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        if e.is_transient() {
            AppError::Unavailable {
                message: e.to_string(),
            }
        } else {
            AppError::Internal {
                message: e.to_string(),
            }
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Repository { source, .. } if source.is_transient() => {
                AppError::Unavailable {
                    message: source.to_string(),
                }
            }
            SearchError::ExpansionLimit(_) | SearchError::Timeout => AppError::Unavailable {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
