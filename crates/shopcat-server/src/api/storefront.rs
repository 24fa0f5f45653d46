use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{json_body, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct UrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ValidationItem {
    valid: bool,
    is_shopify: bool,
    message: String,
}

fn required_url(request_id: &str, url: Option<String>) -> Result<String, ApiError> {
    url.map(|u| u.trim().to_owned())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::new(request_id, "validation_error", "No URL provided"))
}

pub(super) async fn validate_url(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ValidationItem>>, ApiError> {
    let request = json_body(&req_id.0, body)?;
    let url = required_url(&req_id.0, request.url)?;

    let is_shopify = state.client.probe_storefront(&url).await.map_err(|e| {
        tracing::debug!(%url, error = %e, "rejected storefront URL");
        ApiError::new(req_id.0.clone(), "validation_error", "Invalid URL format")
    })?;

    let message = if is_shopify {
        "URL valid (Shopify detected)"
    } else {
        "URL valid"
    };
    Ok(Json(ApiResponse::new(
        req_id.0,
        ValidationItem {
            valid: true,
            is_shopify,
            message: message.to_owned(),
        },
    )))
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UrlRequest>,
) -> Result<Json<ApiResponse<Vec<Value>>>, ApiError> {
    let url = required_url(&req_id.0, query.url)?;
    shopcat_scraper::validate_base_url(&url).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("Invalid URL format: {e}"),
        )
    })?;

    let collections = state.client.fetch_collections(&url).await.map_err(|e| {
        tracing::warn!(%url, error = %e, "collections fetch failed");
        ApiError::new(req_id.0.clone(), "upstream_error", e.to_string())
    })?;

    Ok(Json(ApiResponse::new(req_id.0, collections)))
}
