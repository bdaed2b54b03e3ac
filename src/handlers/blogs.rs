//! Blog resource: CRUD against the document store, with a configurable
//! create mode (persist the post, or relay it as an email notification).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::config::BlogSubmitMode;
use crate::error::ApiError;
use crate::mailer::compose;
use crate::middleware::require_admin;
use crate::state::AppState;
use crate::store::BLOGS;
use crate::validate::{normalize_tags, Rules, Schema};

use super::{object_payload, parse_id, tags_vec, text};

fn schema() -> Schema {
    Schema::new()
        .field("title", Rules::required())
        .field("description", Rules::required())
        .field("content", Rules::required())
        .field("author", Rules::required())
        .field("image", Rules::optional())
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    require_admin(
        &state.config.security,
        state.config.security.gate_blog_writes,
        &headers,
    )?;

    let payload = object_payload(payload)?;

    // Collect schema failures and the tags failure together so the caller
    // sees every bad field in one response.
    let mut errors = Vec::new();
    let mut fields = match schema().check(&payload) {
        Ok(fields) => fields,
        Err(failures) => {
            errors = failures;
            Default::default()
        }
    };
    let tags = match normalize_tags(payload.get("tags").unwrap_or(&Value::Null)) {
        Ok(tags) => tags,
        Err(failure) => {
            errors.push(failure);
            Value::Array(Vec::new())
        }
    };
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    fields.insert("tags".to_string(), tags);

    match state.config.routes.blog_submit_mode {
        BlogSubmitMode::Persist => {
            let doc = state.store.insert(BLOGS, fields).await?;
            Ok(Json(json!({ "ok": true, "blog": doc.to_json() })))
        }
        BlogSubmitMode::Notify => {
            let mail = compose::blog_notice_email(
                &state.config.mail,
                text(&fields, "title"),
                text(&fields, "author"),
                &tags_vec(&fields),
                text(&fields, "content"),
            );
            state.mailer.send(mail).await?;
            Ok(Json(json!({ "ok": true, "message": "Blog notification sent" })))
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let docs = state.store.list(BLOGS).await?;
    let blogs: Vec<Value> = docs.iter().map(|d| d.to_json()).collect();
    Ok(Json(json!({ "ok": true, "blogs": blogs })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    require_admin(
        &state.config.security,
        state.config.security.gate_blog_writes,
        &headers,
    )?;

    let id = parse_id(&id)?;
    let payload = object_payload(payload)?;

    let mut fields = schema().check_update(&payload)?;
    if let Some(tags) = payload.get("tags") {
        if !tags.is_null() {
            let tags = normalize_tags(tags).map_err(|e| ApiError::validation(vec![e]))?;
            fields.insert("tags".to_string(), tags);
        }
    }

    let doc = state.store.update(BLOGS, id, fields).await?;
    Ok(Json(json!({ "ok": true, "blog": doc.to_json() })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_admin(
        &state.config.security,
        state.config.security.gate_blog_writes,
        &headers,
    )?;

    let id = parse_id(&id)?;
    state.store.delete(BLOGS, id).await?;
    Ok(Json(json!({ "ok": true, "message": "Deleted" })))
}
