//! POST /api/contact: validate the submission and relay it as email.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::mailer::compose;
use crate::state::AppState;
use crate::validate::{Rules, Schema};

use super::{object_payload, opt_text, text};

fn schema() -> Schema {
    Schema::new()
        .field("name", Rules::required())
        .field("email", Rules::required().email())
        .field("message", Rules::required())
        .field("subject", Rules::optional())
        .field("phone", Rules::optional())
}

pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let payload = object_payload(payload)?;
    let fields = schema().check(&payload)?;

    let subject = opt_text(&fields, "subject").unwrap_or("Contact via website");
    let mail = compose::contact_email(
        &state.config.mail,
        text(&fields, "name"),
        text(&fields, "email"),
        opt_text(&fields, "phone"),
        subject,
        text(&fields, "message"),
    );

    state.mailer.send(mail).await?;
    Ok(Json(json!({ "ok": true, "message": "Sent" })))
}
