/// send-to-assistant webhook: validation, session branching and error mapping
#[path = "common/mod.rs"]
mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const URI: &str = "/backend/send-to-assistant";

async fn mount_assistant_ok(h: &Harness) {
    Mock::given(method("POST"))
        .and(path(ASSISTANT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(assistant_reply()))
        .mount(&h.server)
        .await;
}

#[tokio::test]
async fn new_lead_starts_conversation() {
    let h = Harness::new(vec![]).await;
    mount_assistant_ok(&h).await;

    let (status, body) = h
        .call(json_request(
            URI,
            json!({
                "email": "jane@example.com",
                "first_name": "Jane",
                "area_code": "94107",
                "interest": "a yard for the dog"
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message_status"], "Success");
    assert_eq!(body["data"]["session_id"], "webhook:email:jane@example.com");
    assert_eq!(body["data"]["account_sid"], "AC123");
    assert_eq!(body["data"]["flagged"], false);

    let sent = h.received_json(ASSISTANT_PATH).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["identity"], JANE);
    assert_eq!(sent[0]["webhook"], WEBHOOK_URL);
    assert_eq!(sent[0]["mode"], "email");
    assert!(sent[0].get("session_id").is_none());
    assert!(
        sent[0]["body"]
            .as_str()
            .unwrap()
            .contains("additional information: \"a yard for the dog\"")
    );
}

#[tokio::test]
async fn form_encoded_lead_is_accepted() {
    let h = Harness::new(vec![]).await;
    mount_assistant_ok(&h).await;

    let (status, _) = h
        .call(form_request(
            URI,
            "email=jane%40example.com&first_name=Jane&area_code=94107",
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.received_json(ASSISTANT_PATH).await.len(), 1);
}

#[tokio::test]
async fn reply_continues_existing_session() {
    let h = Harness::new(vec![existing_session()]).await;
    mount_assistant_ok(&h).await;

    let (status, _) = h
        .call(json_request(
            URI,
            json!({ "email": "jane@example.com", "response": "Saturday morning works" }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let sent = h.received_json(ASSISTANT_PATH).await;
    assert_eq!(sent[0]["session_id"], "email:jane@example.com");
    assert_eq!(sent[0]["body"], "Saturday morning works");
}

#[tokio::test]
async fn missing_email_is_bad_request() {
    let h = Harness::new(vec![]).await;

    let (status, body) = h
        .call(json_request(URI, json!({ "first_name": "Jane" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Missing required field: email");
    assert_eq!(body["error"]["status"], 400);
    assert!(body["error"].get("details").is_none());
}

#[tokio::test]
async fn invalid_email_is_bad_request() {
    let h = Harness::new(vec![]).await;

    let (status, body) = h
        .call(json_request(
            URI,
            json!({ "email": "jane-at-example", "first_name": "Jane", "area_code": "94107" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid email format");
}

#[tokio::test]
async fn neither_reply_nor_lead_is_bad_request() {
    let h = Harness::new(vec![]).await;

    let (status, body) = h
        .call(json_request(
            URI,
            json!({ "email": "jane@example.com", "response": "hi" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request:")
    );
    assert!(h.received_json(ASSISTANT_PATH).await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let h = Harness::new(vec![]).await;

    let (status, body) = h
        .call(signed_request(URI, "application/json", "{not json"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

async fn mount_assistant_unauthorized(h: &Harness) {
    Mock::given(method("POST"))
        .and(path(ASSISTANT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 20003,
            "message": "Authenticate",
            "more_info": "https://www.twilio.com/docs/errors/20003",
            "status": 401
        })))
        .mount(&h.server)
        .await;
}

#[tokio::test]
async fn assistant_failure_is_internal_error_without_details() {
    let h = Harness::new(vec![]).await;
    mount_assistant_unauthorized(&h).await;

    let (status, body) = h
        .call(json_request(
            URI,
            json!({ "email": "jane@example.com", "first_name": "Jane", "area_code": "94107" }),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Authenticate");
    assert_eq!(body["error"]["status"], 500);
    assert!(body["error"].get("details").is_none());
}

#[tokio::test]
async fn development_mode_includes_upstream_details() {
    let h = Harness::development(vec![]).await;
    mount_assistant_unauthorized(&h).await;

    let (status, body) = h
        .call(json_request(
            URI,
            json!({ "email": "jane@example.com", "first_name": "Jane", "area_code": "94107" }),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let details = &body["error"]["details"];
    assert_eq!(details["kind"], "assistant");
    assert_eq!(details["code"], 20003);
    assert_eq!(details["status"], 401);
    assert_eq!(
        details["more_info"],
        "https://www.twilio.com/docs/errors/20003"
    );
}
