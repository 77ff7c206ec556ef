//! Common test utilities: a router wired to wiremock-backed vendor APIs
#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use leadrelay_api::auth::{BasicCredentials, WebhookAuth, twilio};
use leadrelay_api::{AppContext, router};
use leadrelay_core::models::Session;
use leadrelay_core::services::{InMemorySessionStore, SendGridProvider, TwilioAssistantClient};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::MockServer;

pub const WEBHOOK_URL: &str = "https://relay-1234.twil.io/backend/log-sessions";
pub const ASSISTANT_PATH: &str = "/v1/Assistants/aia_asst_1/Messages";
pub const SENDGRID_PATH: &str = "/v3/mail/send";
pub const JANE: &str = "email:jane@example.com";
pub const PUBLIC_BASE_URL: &str = "https://relay-1234.twil.io";
pub const AUTH_TOKEN: &str = "token";

pub struct Harness {
    /// Stands in for both the assistant API and SendGrid
    pub server: MockServer,
    pub sessions: Arc<InMemorySessionStore>,
    pub app: Router,
}

impl Harness {
    pub async fn new(sessions: Vec<Session>) -> Self {
        Self::build(sessions, false).await
    }

    pub async fn development(sessions: Vec<Session>) -> Self {
        Self::build(sessions, true).await
    }

    async fn build(sessions: Vec<Session>, development: bool) -> Self {
        let server = MockServer::start().await;
        let sessions = Arc::new(InMemorySessionStore::with_sessions(sessions));

        let assistant =
            TwilioAssistantClient::new(server.uri(), "AC123", AUTH_TOKEN, "aia_asst_1").unwrap();
        let email = SendGridProvider::new("SG.test", "homes@owlhomes.com", server.uri()).unwrap();

        let ctx = AppContext::from_parts(
            Arc::new(assistant),
            sessions.clone(),
            Arc::new(email),
            WEBHOOK_URL.to_string(),
            webhook_auth(),
            development,
        );

        Self {
            server,
            sessions,
            app: router(Arc::new(ctx)),
        }
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// JSON bodies the mock server received on `path`
    pub async fn received_json(&self, path: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

pub fn existing_session() -> Session {
    Session::new(JANE, "webhook:email:jane@example.com")
}

pub fn webhook_auth() -> WebhookAuth {
    WebhookAuth {
        twilio_auth_token: AUTH_TOKEN.to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        inbound: inbound_credentials(),
    }
}

pub fn inbound_credentials() -> BasicCredentials {
    BasicCredentials::new("sendgrid", "parse-secret")
}

pub fn post(uri: &str, content_type: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.into()))
        .unwrap()
}

/// A non-form request signed the way Twilio signs JSON bodies
pub fn signed_request(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    let uri = format!("{}?bodySHA256={}", uri, twilio::body_sha256(body.as_bytes()));
    let signature = twilio::compute_signature(
        AUTH_TOKEN,
        &format!("{}{}", PUBLIC_BASE_URL, uri),
        &[],
    );

    let mut request = post(&uri, content_type, body);
    request
        .headers_mut()
        .insert("x-twilio-signature", signature.parse().unwrap());
    request
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    signed_request(uri, "application/json", &body.to_string())
}

/// Form-encoded request signed over the URL and its parameters
pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    let signature = twilio::compute_signature(
        AUTH_TOKEN,
        &format!("{}{}", PUBLIC_BASE_URL, uri),
        &twilio::form_params(body.as_bytes()),
    );

    let mut request = unsigned_form_request(uri, body);
    request
        .headers_mut()
        .insert("x-twilio-signature", signature.parse().unwrap());
    request
}

pub fn unsigned_form_request(uri: &str, body: &str) -> Request<Body> {
    post(uri, "application/x-www-form-urlencoded", body)
}

/// Inbound Parse post carrying the configured basic auth credentials
pub fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let mut request = unauthenticated_multipart_request(uri, fields);
    request.headers_mut().insert(
        "authorization",
        inbound_credentials().header_value().parse().unwrap(),
    );
    request
}

pub fn unauthenticated_multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "leadrelay-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    post(
        uri,
        &format!("multipart/form-data; boundary={}", boundary),
        body,
    )
}

pub fn assistant_reply() -> Value {
    serde_json::json!({
        "status": "Success",
        "session_id": "webhook:email:jane@example.com",
        "account_sid": "AC123",
        "body": "Message queued",
        "flagged": false,
        "aborted": false
    })
}
