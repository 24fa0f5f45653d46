use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopcat_core::{products_per_minute, round2, CanonicalProduct, ScrapeMetrics};
use uuid::Uuid;

use crate::middleware::RequestId;
use crate::sessions::{
    run_scrape_job, ScrapeJob, ScrapeSession, SessionStatus, FINISHED_SESSION_TTL,
};

use super::{json_body, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    pub url: Option<String>,
    pub max_products: Option<usize>,
    /// Delay between page requests, in milliseconds.
    pub rate_limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeStarted {
    session_id: Uuid,
    status: SessionStatus,
    message: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ProgressItem {
    session_id: Uuid,
    url: String,
    status: SessionStatus,
    total_products: usize,
    products_per_minute: f64,
    elapsed_time: f64,
    latest_product: Option<CanonicalProduct>,
    errors: Vec<String>,
    metrics: Option<ScrapeMetrics>,
    output_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResultsItem {
    session_id: Uuid,
    total_products: usize,
    products: Vec<CanonicalProduct>,
    metrics: Option<ScrapeMetrics>,
}

pub(super) async fn start_scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ScrapeStarted>>, ApiError> {
    let request = json_body(&req_id.0, body)?;
    let url = request
        .url
        .map(|u| u.trim().to_owned())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "validation_error", "No URL provided"))?;

    shopcat_scraper::validate_base_url(&url).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("Invalid URL format: {e}"),
        )
    })?;

    let max_products = request
        .max_products
        .unwrap_or(state.config.scraper_default_max_products);
    let rate_limit_ms = request
        .rate_limit
        .unwrap_or(state.config.scraper_rate_limit_ms);

    let evicted = state.sessions.evict_finished(FINISHED_SESSION_TTL);
    if evicted > 0 {
        tracing::debug!(evicted, "dropped expired scrape sessions");
    }

    let session_id = Uuid::new_v4();
    state.sessions.insert(ScrapeSession::new(session_id, &url));

    let job = ScrapeJob {
        session_id,
        url,
        max_products,
        rate_limit_ms,
        client: state.client.clone(),
        output_dir: state.config.output_dir.clone(),
    };
    tokio::spawn(run_scrape_job(state.sessions.clone(), job));

    Ok(Json(ApiResponse::new(
        req_id.0,
        ScrapeStarted {
            session_id,
            status: SessionStatus::Running,
            message: "Scraping started".to_owned(),
        },
    )))
}

pub(super) async fn get_progress(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ProgressItem>>, ApiError> {
    let id = parse_session_id(&req_id.0, &session_id)?;
    let progress = state
        .sessions
        .with_session(id, |session| {
            let elapsed = session.elapsed().as_secs_f64();
            ProgressItem {
                session_id: session.id,
                url: session.url.clone(),
                status: session.status,
                total_products: session.products.len(),
                products_per_minute: round2(products_per_minute(session.products.len(), elapsed)),
                elapsed_time: round2(elapsed),
                latest_product: session.latest_product.clone(),
                errors: session.errors.clone(),
                metrics: session.metrics.clone(),
                output_file: session
                    .output_file
                    .as_ref()
                    .map(|p| p.display().to_string()),
            }
        })
        .ok_or_else(|| session_not_found(&req_id.0, id))?;

    Ok(Json(ApiResponse::new(req_id.0, progress)))
}

pub(super) async fn get_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ResultsItem>>, ApiError> {
    let id = parse_session_id(&req_id.0, &session_id)?;
    let results = state
        .sessions
        .with_session(id, |session| {
            if session.status != SessionStatus::Completed {
                return Err(session.status);
            }
            Ok(ResultsItem {
                session_id: session.id,
                total_products: session.products.len(),
                products: session.products.clone(),
                metrics: session.metrics.clone(),
            })
        })
        .ok_or_else(|| session_not_found(&req_id.0, id))?
        .map_err(|status| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("Scraping not completed. Status: {status}"),
            )
        })?;

    Ok(Json(ApiResponse::new(req_id.0, results)))
}

/// Ids that are not UUIDs can never name a session, so they are a 404 too.
fn parse_session_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            request_id,
            "not_found",
            format!("session {raw} not found"),
        )
    })
}

fn session_not_found(request_id: &str, id: Uuid) -> ApiError {
    ApiError::new(request_id, "not_found", format!("session {id} not found"))
}
