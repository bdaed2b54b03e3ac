//! Career resource: openings are CRUD against the document store; job
//! applications are transient and relayed as email with the resume attached.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::mailer::{compose, Attachment};
use crate::middleware::require_admin;
use crate::state::AppState;
use crate::store::CAREERS;
use crate::upload::{document_content_type, is_allowed_document};
use crate::validate::{Rules, Schema};

use super::{object_payload, opt_text, parse_id, text};

fn opening_schema() -> Schema {
    Schema::new()
        .field("title", Rules::required())
        .field("department", Rules::required())
        .field("location", Rules::required())
        .field("jobType", Rules::required())
        .field("description", Rules::required())
        .field("requirements", Rules::optional())
        .field("applyLink", Rules::optional())
}

fn application_schema() -> Schema {
    Schema::new()
        .field("name", Rules::required())
        .field("email", Rules::required().email())
        .field("phone", Rules::optional())
        .field("position", Rules::required())
        .field("coverLetter", Rules::optional())
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    require_admin(
        &state.config.security,
        state.config.security.gate_career_writes,
        &headers,
    )?;

    let payload = object_payload(payload)?;
    let fields = opening_schema().check(&payload)?;

    let doc = state.store.insert(CAREERS, fields).await?;
    Ok(Json(json!({ "ok": true, "career": doc.to_json() })))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let docs = state.store.list(CAREERS).await?;
    let careers: Vec<Value> = docs.iter().map(|d| d.to_json()).collect();
    Ok(Json(json!({ "ok": true, "careers": careers })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    require_admin(
        &state.config.security,
        state.config.security.gate_career_writes,
        &headers,
    )?;

    let id = parse_id(&id)?;
    let payload = object_payload(payload)?;
    let fields = opening_schema().check_update(&payload)?;

    let doc = state.store.update(CAREERS, id, fields).await?;
    Ok(Json(json!({ "ok": true, "career": doc.to_json() })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_admin(
        &state.config.security,
        state.config.security.gate_career_writes,
        &headers,
    )?;

    let id = parse_id(&id)?;
    state.store.delete(CAREERS, id).await?;
    Ok(Json(json!({ "ok": true, "message": "Deleted" })))
}

/// POST /api/careers/apply: multipart form with text fields and an optional
/// `resume` part. The application is never persisted; its storage is the
/// email it produces.
pub async fn apply(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut payload = Map::new();
    let mut resume: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let filename = field.file_name().unwrap_or("resume").to_string();
            let bytes = field.bytes().await.map_err(read_error)?;
            resume = Some((filename, bytes.to_vec()));
        } else if !name.is_empty() {
            let value = field.text().await.map_err(read_error)?;
            payload.insert(name, Value::String(value));
        }
    }

    let fields = application_schema().check(&payload)?;

    let attachment = match resume {
        Some((filename, bytes)) => {
            if !is_allowed_document(&filename) {
                return Err(ApiError::unsupported_type(
                    "Only .pdf, .doc and .docx resumes are accepted",
                ));
            }
            if bytes.len() > state.config.upload.max_document_bytes {
                return Err(ApiError::payload_too_large("Resume exceeds the size limit"));
            }
            Some(Attachment {
                content_type: document_content_type(&filename).to_string(),
                filename,
                bytes,
            })
        }
        None => None,
    };

    let mail = compose::application_email(
        &state.config.mail,
        text(&fields, "name"),
        text(&fields, "email"),
        opt_text(&fields, "phone"),
        text(&fields, "position"),
        opt_text(&fields, "coverLetter"),
        attachment,
    );

    state.mailer.send(mail).await?;
    Ok(Json(json!({ "ok": true, "message": "Application sent" })))
}

fn read_error(err: MultipartError) -> ApiError {
    ApiError::bad_request(format!("Invalid multipart body: {err}"))
}
