/// send-to-assistant webhook
use axum::{Json, extract::State};
use leadrelay_core::models::LeadEvent;
use serde_json::Value;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::response::success;

/// Relays a new lead or a lead's reply to the assistant
pub async fn send_to_assistant(
    State(ctx): State<Arc<AppContext>>,
    Payload(event): Payload<LeadEvent>,
) -> Result<Json<Value>, ApiError> {
    let outcome = ctx
        .relay
        .send_to_assistant(&event)
        .await
        .map_err(|e| ctx.api_error(e))?;

    Ok(Json(success(outcome)))
}
