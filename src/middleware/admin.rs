//! Shared-secret admin gate for mutating routes.
//!
//! Runs before validation and any side effect; a denied request gets the
//! uniform 401 envelope and nothing else happens. Which routes are gated is
//! configuration (`gate_blog_writes`, `gate_career_writes`), not a hardcoded
//! set.

use axum::http::HeaderMap;

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// Check the admin credential for a gated route. `gated` comes from the
/// per-resource configuration flag; ungated routes pass through.
pub fn require_admin(
    security: &SecurityConfig,
    gated: bool,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    if !gated {
        return Ok(());
    }

    // No configured key fails closed rather than open.
    let Some(expected) = security.admin_api_key.as_deref() else {
        tracing::warn!("gated route hit but ADMIN_API_KEY is not configured");
        return Err(ApiError::unauthorized("Unauthorized"));
    };

    let presented = extract_credential(headers);

    // Plain string comparison; not constant-time.
    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::unauthorized("Unauthorized")),
    }
}

/// Credential from either the `x-api-key` header or a Bearer-style
/// `Authorization` header.
fn extract_credential(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get("x-api-key") {
        return value.to_str().ok();
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
