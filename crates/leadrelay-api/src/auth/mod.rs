/// Webhook authentication
///
/// Twilio-facing routes require a valid `X-Twilio-Signature`; the Inbound
/// Parse route requires the basic auth credentials configured in SendGrid.
pub mod basic;
pub mod twilio;

pub use basic::BasicCredentials;

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use leadrelay_core::constants::{MAX_REQUEST_BODY_BYTES, TWILIO_SIGNATURE_HEADER};
use leadrelay_core::{Config, RelayError};
use std::sync::Arc;
use tracing::warn;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::extract::is_form_encoded;

/// Secrets the webhook middleware checks requests against
#[derive(Debug, Clone)]
pub struct WebhookAuth {
    /// Key for Twilio request signatures
    pub twilio_auth_token: String,

    /// Public origin Twilio signs against, e.g. `https://relay-1234.twil.io`
    pub public_base_url: String,

    pub inbound: BasicCredentials,
}

impl WebhookAuth {
    pub fn from_config(config: &Config) -> Result<Self, RelayError> {
        Ok(Self {
            twilio_auth_token: config.twilio_auth_token.clone(),
            public_base_url: config.public_base_url()?,
            inbound: BasicCredentials::new(
                &config.inbound_parse_username,
                &config.inbound_parse_password,
            ),
        })
    }

    /// The URL as Twilio saw it when signing
    pub fn signed_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.public_base_url, path_and_query)
    }
}

/// Rejects requests that do not carry a valid Twilio signature
pub async fn twilio_signature_middleware(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_REQUEST_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = ctx.auth.signed_url(path_and_query);

    let signature = parts
        .headers
        .get(TWILIO_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!(path = %parts.uri.path(), "Missing Twilio signature");
            ApiError::Forbidden("Missing X-Twilio-Signature header".to_string())
        })?;

    let params = if is_form_encoded(&parts.headers) {
        twilio::form_params(&bytes)
    } else if twilio::body_matches_hash(parts.uri.query(), &bytes) {
        Vec::new()
    } else {
        warn!(path = %parts.uri.path(), "Request body does not match bodySHA256");
        return Err(ApiError::Forbidden("Invalid Twilio signature".to_string()));
    };

    if !twilio::verify_signature(&ctx.auth.twilio_auth_token, &url, &params, signature) {
        warn!(path = %parts.uri.path(), "Invalid Twilio signature");
        return Err(ApiError::Forbidden("Invalid Twilio signature".to_string()));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Rejects Inbound Parse posts without the configured basic auth credentials
pub async fn inbound_auth_middleware(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !ctx.auth.inbound.matches(header) {
        warn!(path = %request.uri().path(), "Rejected inbound email without valid credentials");
        return Err(ApiError::Unauthorized(
            "Invalid or missing credentials".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
