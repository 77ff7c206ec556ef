/// Leadrelay API - webhook Lambda
///
/// Routes the send-to-assistant, log-sessions and inbound email webhooks.
pub mod api;
pub mod auth;
pub mod context;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;

pub use context::AppContext;
pub use error::ApiError;

use axum::{
    Router,
    body::Body as AxumBody,
    extract::DefaultBodyLimit,
    http::{Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use lambda_http::{Body, Error as LambdaError, Request, Response};
use leadrelay_core::constants::{
    LOG_SESSIONS_PATH, MAX_REQUEST_BODY_BYTES, TWILIO_SIGNATURE_HEADER,
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Builds the webhook router
pub fn router(ctx: Arc<AppContext>) -> Router {
    // Routes called by Twilio must carry its request signature
    let twilio = Router::new()
        .route(
            "/backend/send-to-assistant",
            post(api::assistant::send_to_assistant),
        )
        .route(LOG_SESSIONS_PATH, post(api::sessions::log_sessions))
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&ctx),
            auth::twilio_signature_middleware,
        ));

    let inbound = Router::new()
        .route("/inbound/email", post(api::inbound::inbound_email))
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&ctx),
            auth::inbound_auth_middleware,
        ));

    Router::new()
        .route("/health", get(api::health::handler))
        .merge(twilio)
        .merge(inbound)
        .route_layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    header::HeaderName::from_static(TWILIO_SIGNATURE_HEADER),
                ]),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(ctx)
}

/// Main Lambda handler - converts Lambda HTTP request to Axum router
pub async fn handler(ctx: Arc<AppContext>, event: Request) -> Result<Response<Body>, LambdaError> {
    info!("Processing webhook: {} {}", event.method(), event.uri().path());

    let (parts, body) = event.into_parts();
    let axum_request = http::Request::from_parts(parts, AxumBody::from(body.to_vec()));

    let response = match router(ctx).oneshot(axum_request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|e| error!("Failed to read response body: {}", e))
        .unwrap_or_default();

    Ok(Response::from_parts(parts, Body::from(body_bytes.to_vec())))
}
