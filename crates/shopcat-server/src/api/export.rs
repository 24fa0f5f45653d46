use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use shopcat_export::ExportFormat;

use crate::middleware::RequestId;

use super::{json_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ExportRequest {
    #[serde(default)]
    pub products: Vec<Value>,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    ExportFormat::Json.to_string()
}

/// Writes the posted products to the output directory and returns the file
/// as an attachment.
pub(super) async fn export_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(&req_id.0, body)?;
    if request.products.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "No products provided",
        ));
    }
    let format: ExportFormat = request
        .format
        .parse()
        .map_err(|e: shopcat_export::ExportError| {
            ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
        })?;

    let stem = format!("products_{}", chrono::Utc::now().timestamp());
    let output_dir = state.config.output_dir.clone();
    let products = request.products;
    let count = products.len();

    let written = tokio::task::spawn_blocking(move || {
        let path = shopcat_export::write_export(&output_dir, &stem, format, &products)?;
        let bytes = std::fs::read(&path)?;
        Ok::<_, shopcat_export::ExportError>((path, bytes))
    })
    .await;

    let (path, bytes) = match written {
        Ok(Ok(written)) => written,
        Ok(Err(e)) => {
            tracing::error!(error = %e, %format, "export failed");
            return Err(ApiError::new(req_id.0, "internal_error", e.to_string()));
        }
        Err(e) => {
            tracing::error!(error = %e, "export task panicked");
            return Err(ApiError::new(req_id.0, "internal_error", "export failed"));
        }
    };

    let filename = path
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
    tracing::info!(%format, count, %filename, "export served");

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
