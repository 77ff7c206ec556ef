/// log-sessions webhook - receives assistant replies
///
/// The assistant posts every reply here. The session id is recorded under
/// the conversation identity so the next lead response continues the same
/// session, and replies for email identities are delivered to the lead.
use axum::{Json, extract::State};
use chrono::Utc;
use leadrelay_core::constants::EMAIL_IDENTITY_PREFIX;
use leadrelay_core::models::{AssistantCallback, SendOptions, Session};
use leadrelay_core::utils::logging::{redact_body, redact_email};
use leadrelay_core::utils::validation::non_blank;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::response::success;

#[tracing::instrument(name = "api.log_sessions", skip(ctx, callback))]
pub async fn log_sessions(
    State(ctx): State<Arc<AppContext>>,
    Payload(callback): Payload<AssistantCallback>,
) -> Result<Json<Value>, ApiError> {
    let identity = non_blank(callback.identity.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: Identity".to_string()))?;
    let session_id = non_blank(callback.session_id.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: SessionId".to_string()))?;

    let mut session = ctx
        .sessions
        .get_session(identity)
        .await
        .map_err(|e| ctx.api_error(e))?
        .unwrap_or_else(|| Session::new(identity, session_id));
    session.session_id = session_id.to_string();
    session.updated_at = Utc::now();

    ctx.sessions
        .put_session(&session)
        .await
        .map_err(|e| ctx.api_error(e))?;

    info!(
        identity = %redact_email(identity),
        status = ?callback.status,
        "Recorded assistant session"
    );

    let body = non_blank(callback.body.as_deref());
    let deliverable = identity.starts_with(EMAIL_IDENTITY_PREFIX) && !callback.is_failed();

    let delivery = match body {
        Some(body) if deliverable => {
            let options = SendOptions {
                last_message_id: session.last_message_id.clone(),
                ..Default::default()
            };
            let sent = ctx
                .email
                .send(identity, body, None, &options)
                .await
                .map_err(|e| ctx.api_error(e))?;

            info!(
                identity = %redact_email(identity),
                body = %redact_body(body),
                message_id = ?sent.message_id,
                "Delivered assistant reply"
            );

            if let Some(message_id) = &sent.message_id {
                session.last_message_id = Some(message_id.clone());
                session.updated_at = Utc::now();
                ctx.sessions
                    .put_session(&session)
                    .await
                    .map_err(|e| ctx.api_error(e))?;
            }
            Some(sent)
        }
        _ => {
            if callback.is_failed() {
                warn!(identity = %redact_email(identity), "Assistant reported a failed reply");
            }
            None
        }
    };

    Ok(Json(success(json!({
        "identity": identity,
        "session_id": session.session_id,
        "delivery": delivery,
    }))))
}
