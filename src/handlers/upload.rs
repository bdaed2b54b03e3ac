//! POST /api/upload: store a single image under the content directory and
//! return its externally reachable address.

use axum::extract::multipart::MultipartError;
use axum::extract::{Host, Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;
use crate::upload::{public_url, save, stored_image_name};
use crate::validate::FieldError;

pub async fn image(
    State(state): State<AppState>,
    Host(host): Host,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some("image") {
            // Drain and ignore parts we don't recognize.
            let _ = field.bytes().await.map_err(read_error)?;
            continue;
        }

        let original = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field.bytes().await.map_err(read_error)?;

        // Enforce the cap before anything touches the filesystem.
        if bytes.len() > state.config.upload.max_image_bytes {
            return Err(ApiError::payload_too_large("Image exceeds the size limit"));
        }

        let stored_name = stored_image_name(&original);
        save(&state.config.upload.dir, &stored_name, &bytes)
            .await
            .map_err(|e| {
                tracing::error!("failed to store upload {}: {}", stored_name, e);
                ApiError::internal("Failed to store upload")
            })?;

        let scheme = forwarded_scheme(&headers);
        let url = public_url(scheme, &host, &stored_name);
        tracing::info!(file = %stored_name, size = bytes.len(), "stored upload");
        return Ok(Json(json!({ "ok": true, "url": url })));
    }

    Err(ApiError::validation(vec![FieldError::new(
        "image",
        "is required",
    )]))
}

/// Scheme for the public address: honor the proxy's forwarded protocol,
/// otherwise plain HTTP (TLS terminates upstream).
fn forwarded_scheme(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http")
}

fn read_error(err: MultipartError) -> ApiError {
    ApiError::bad_request(format!("Invalid multipart body: {err}"))
}
