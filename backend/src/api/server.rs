//! HTTP Server for the film dashboard API.
//!
//! The catalogue is loaded once at startup and shared read-only between
//! requests; every endpoint recomputes its answer from it.
//!
//! # API Endpoints
//!
//! | Method | Path                          | Description                         |
//! |--------|-------------------------------|-------------------------------------|
//! | GET    | `/health`                     | Health check and catalogue summary  |
//! | GET    | `/api/counts/{field}`         | Token tally (`genre` or `language`) |
//! | GET    | `/api/stats?genre=&language=` | Match count and mean score          |
//! | GET    | `/api/films?genre=&language=` | Matching films, source order        |
//! | GET    | `/api/top?genre=&language=&n=`| Best-scored matching films          |
//! | GET    | `/api/years`                  | Distinct premiere years             |
//! | GET    | `/api/years/{year}/languages` | Language shares for one year        |
//! | GET    | `/api/logs`                   | SSE stream for real-time logs       |

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::Value;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{
    error_response, schema_mismatch_response, CountsResponse, FilmsResponse, FilterParams,
    HealthResponse, StatsResponse, TopParams, TopResponse, YearLanguagesResponse, YearsResponse,
};
use crate::config::{DashboardConfig, MAX_TOP_N};
use crate::dataset::Dataset;
use crate::error::{SchemaMismatch, ServerError, ServerResult};
use crate::models::CategoryField;
use crate::query;

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub top_n: usize,
}

impl AppState {
    pub fn new(dataset: Dataset, config: &DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            top_n: config.top_n,
        }
    }
}

/// Build the router. Separate from [`start_server`] so it can be driven
/// without a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/counts/{field}", get(counts))
        .route("/api/stats", get(stats))
        .route("/api/films", get(films))
        .route("/api/top", get(top))
        .route("/api/years", get(years))
        .route("/api/years/{year}/languages", get(year_languages))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Load the catalogue and serve until shutdown.
pub async fn start_server(config: DashboardConfig) -> ServerResult<()> {
    let path = config.data_path.clone().ok_or_else(|| {
        ServerError::BadRequest("No catalogue given (use --data or FILMDASH_DATA)".to_string())
    })?;

    let dataset = Dataset::from_path(&path)?;
    let app = router(AppState::new(dataset, &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log_info(format!("🚀 Film dashboard API running on http://localhost:{}", config.port));
    log_info("   GET /api/counts/{genre|language}");
    log_info("   GET /api/stats  /api/films  /api/top");
    log_info("   GET /api/years  /api/years/{year}/languages");
    log_info("   GET /api/logs   - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn bad_request(message: impl AsRef<str>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response(message.as_ref())))
}

fn unprocessable(err: SchemaMismatch) -> ApiError {
    log_error(err.to_string());
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(schema_mismatch_response(&err.missing)),
    )
}

/// Malformed query strings get the same JSON error body as missing ones.
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

/// Both filter parameters are required; an empty language matches all.
fn require_filter(genre: Option<String>, language: Option<String>) -> Result<(String, String), ApiError> {
    let genre = genre
        .filter(|g| !g.trim().is_empty())
        .ok_or_else(|| bad_request("Missing query parameter 'genre'"))?;
    let language = language.ok_or_else(|| bad_request("Missing query parameter 'language'"))?;
    Ok((genre, language))
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "filmdash".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        films: state.dataset.len(),
        missing_columns: state.dataset.schema().missing(),
    })
}

async fn counts(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> ApiResult<CountsResponse> {
    let field: CategoryField = field.parse().map_err(bad_request)?;
    let table = query::count(state.dataset.films(), field);
    Ok(Json(CountsResponse::new(field, table)))
}

async fn stats(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<StatsResponse> {
    let params = query_params(params)?;
    let (genre, language) = require_filter(params.genre, params.language)?;
    let stats = query::stats(&state.dataset, &genre, &language).map_err(unprocessable)?;
    Ok(Json(StatsResponse {
        genre,
        language,
        stats,
    }))
}

async fn films(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<FilmsResponse> {
    let params = query_params(params)?;
    let (genre, language) = require_filter(params.genre, params.language)?;
    let films: Vec<_> = query::matching_films(&state.dataset, &genre, &language)
        .map_err(unprocessable)?
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(FilmsResponse {
        genre,
        language,
        count: films.len(),
        films,
    }))
}

async fn top(
    State(state): State<AppState>,
    params: Result<Query<TopParams>, QueryRejection>,
) -> ApiResult<TopResponse> {
    let params = query_params(params)?;
    let (genre, language) = require_filter(params.genre, params.language)?;
    let limit = params.n.unwrap_or(state.top_n);
    if !(1..=MAX_TOP_N).contains(&limit) {
        return Err(bad_request(format!("'n' must be between 1 and {}", MAX_TOP_N)));
    }

    let films = query::top_films_n(&state.dataset, &genre, &language, limit)
        .map_err(unprocessable)?
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(TopResponse {
        genre,
        language,
        limit,
        films,
    }))
}

async fn years(State(state): State<AppState>) -> Json<YearsResponse> {
    Json(YearsResponse {
        years: query::premiere_years(&state.dataset),
    })
}

async fn year_languages(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> ApiResult<YearLanguagesResponse> {
    let year: i32 = year
        .parse()
        .map_err(|_| bad_request(format!("Invalid year '{}'", year)))?;
    let table = query::language_distribution(&state.dataset, year);
    Ok(Json(YearLanguagesResponse::new(year, &table)))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Film, Schema};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state() -> AppState {
        let dataset = Dataset::from_films(vec![
            Film::new("A", "Documentary", "English/French", "March 5, 2021", 8.5),
            Film::new("B", "Documentary", "English", "June 1, 2020", 9.0),
            Film::new("C", "Drama", "Spanish", "June 1, 2020", 6.1),
        ]);
        AppState::new(dataset, &DashboardConfig::default())
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["films"], 3);
        assert_eq!(body["missingColumns"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_counts() {
        let (status, body) = get_json(state(), "/api/counts/language").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"]["English"], 2);
        assert_eq!(body["counts"]["French"], 1);

        let (status, _) = get_json(state(), "/api/counts/runtime").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, body) = get_json(state(), "/api/stats?genre=Documentary&language=english").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["meanScore"], 8.75);

        let (status, body) = get_json(state(), "/api/stats?genre=Horror&language=Klingon").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
        assert!(body["meanScore"].is_null());
    }

    #[tokio::test]
    async fn test_stats_missing_param() {
        let (status, body) = get_json(state(), "/api/stats?genre=Documentary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_stats_schema_mismatch() {
        let dataset = Dataset::new(vec![], Schema::from_headers(&["Title", "Genre"]));
        let state = AppState::new(dataset, &DashboardConfig::default());

        let (status, body) = get_json(state, "/api/stats?genre=Drama&language=English").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "schemaMismatch");
    }

    #[tokio::test]
    async fn test_top() {
        let (status, body) = get_json(state(), "/api/top?genre=Documentary&language=english&n=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], 1);
        assert_eq!(body["films"][0]["title"], "B");

        let (status, _) = get_json(state(), "/api/top?genre=Documentary&language=english&n=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        let (status, body) = get_json(state(), "/api/top?genre=Documentary&language=english&n=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_films() {
        let (status, body) = get_json(state(), "/api/films?genre=Documentary&language=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["films"][0]["title"], "A");
    }

    #[tokio::test]
    async fn test_years() {
        let (_, body) = get_json(state(), "/api/years").await;
        assert_eq!(body["years"], serde_json::json!([2020, 2021]));

        let (status, body) = get_json(state(), "/api/years/2020/languages").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["hasData"], true);

        let (status, _) = get_json(state(), "/api/years/soon/languages").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
