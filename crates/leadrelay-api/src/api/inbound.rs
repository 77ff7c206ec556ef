/// Inbound email webhook (SendGrid Inbound Parse)
use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;
use leadrelay_core::models::{InboundPayload, LeadEvent, email_identity};
use leadrelay_core::utils::logging::redact_email;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::response::success;

/// Collects the text fields of an inbound parse post; attachments are skipped
pub async fn read_inbound_form(mut multipart: Multipart) -> Result<InboundPayload, ApiError> {
    let mut payload = InboundPayload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let slot = match field.name() {
            Some("headers") => &mut payload.headers,
            Some("from") => &mut payload.from,
            Some("to") => &mut payload.to,
            Some("subject") => &mut payload.subject,
            Some("text") => &mut payload.text,
            Some("html") => &mut payload.html,
            _ => continue,
        };
        *slot = Some(
            field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?,
        );
    }

    Ok(payload)
}

/// Forwards a lead's emailed reply to their assistant session
#[tracing::instrument(name = "api.inbound_email", skip(ctx, multipart))]
pub async fn inbound_email(
    State(ctx): State<Arc<AppContext>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let payload = read_inbound_form(multipart).await?;
    let email = ctx
        .email
        .parse_inbound(&payload)
        .map_err(|e| ctx.api_error(e))?;

    info!(
        from = %redact_email(&email.from_email),
        message_id = ?email.message_id,
        thread_id = ?ctx.email.thread_id(&email),
        "Parsed inbound email"
    );

    // Inbound Parse re-posts anything that is not a 2xx, so mail from
    // senders without a session is acknowledged and dropped.
    let identity = email_identity(&email.from_email);
    let Some(mut session) = ctx
        .sessions
        .get_session(&identity)
        .await
        .map_err(|e| ctx.api_error(e))?
    else {
        info!(from = %redact_email(&email.from_email), "No session for sender, skipping");
        return Ok(Json(success(json!({ "skipped": "no session" }))));
    };

    // Replies to the lead should thread onto the email they just sent.
    if let Some(message_id) = email.message_id.clone() {
        session.last_message_id = Some(message_id);
        session.updated_at = Utc::now();
        ctx.sessions
            .put_session(&session)
            .await
            .map_err(|e| ctx.api_error(e))?;
    }

    let event = LeadEvent {
        email: Some(email.from_email.clone()),
        response: email.text.as_deref().map(|t| t.trim().to_string()),
        ..Default::default()
    };

    let outcome = ctx
        .relay
        .send_to_assistant(&event)
        .await
        .map_err(|e| ctx.api_error(e))?;

    Ok(Json(success(outcome)))
}
