pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod middleware;
pub mod state;
pub mod store;
pub mod upload;
pub mod validate;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SecurityConfig;
use crate::state::AppState;

/// JSON body cap for the plain form routes.
const JSON_BODY_LIMIT: usize = 5 * 1024 * 1024;

/// Multipart parsing overhead allowed on top of the configured file caps;
/// handlers still enforce the exact cap on the file bytes themselves.
const MULTIPART_SLACK: usize = 64 * 1024;

pub fn app(state: AppState) -> Router {
    let image_body_limit = state.config.upload.max_image_bytes + MULTIPART_SLACK;
    let resume_body_limit = state.config.upload.max_document_bytes + MULTIPART_SLACK;

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Form routes
        .route("/api/contact", post(handlers::contact::submit))
        .route(
            "/api/blogs",
            get(handlers::blogs::list).post(handlers::blogs::create),
        )
        .route(
            "/api/blogs/:id",
            put(handlers::blogs::update).delete(handlers::blogs::remove),
        )
        .route(
            "/api/careers",
            get(handlers::careers::list).post(handlers::careers::create),
        )
        .route(
            "/api/careers/:id",
            put(handlers::careers::update).delete(handlers::careers::remove),
        )
        .route(
            "/api/careers/apply",
            post(handlers::careers::apply).layer(DefaultBodyLimit::max(resume_body_limit)),
        )
        .route(
            "/api/upload",
            post(handlers::upload::image).layer(DefaultBodyLimit::max(image_body_limit)),
        )
        // Stored uploads are served straight off the content directory
        .nest_service("/uploads", ServeDir::new(&state.config.upload.dir))
        // Global middleware
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        // No allow-list configured: wide open, the development default.
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
}

async fn root() -> Json<Value> {
    Json(json!({
        "ok": true,
        "name": "formgate",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "contact": "POST /api/contact",
            "blogs": "GET|POST /api/blogs, PUT|DELETE /api/blogs/:id",
            "careers": "GET|POST /api/careers, PUT|DELETE /api/careers/:id, POST /api/careers/apply",
            "upload": "POST /api/upload",
            "uploads": "GET /uploads/:filename",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.mailer.verify().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "status": "ok",
                "timestamp": now,
                "smtp": "ok",
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "ok": false,
                "status": "degraded",
                "timestamp": now,
                "smtp": e.to_string(),
            })),
        ),
    }
}
