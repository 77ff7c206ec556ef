/// Hosted assistant API client (Twilio AI Assistants)
use crate::config::Config;
use crate::error::{AssistantApiError, RelayError};
use crate::models::{AssistantMessage, MessageConfig};
use crate::utils::logging::redact_email;
use async_trait::async_trait;
use serde::Deserialize;

#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Submits a message to the assistant and returns the created message
    async fn create_message(&self, message: &MessageConfig)
    -> Result<AssistantMessage, RelayError>;
}

/// Error document returned by Twilio REST APIs
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
    #[serde(default)]
    status: Option<u16>,
}

pub struct TwilioAssistantClient {
    client: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    assistant_id: String,
}

impl TwilioAssistantClient {
    pub fn new(
        base_url: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        assistant_id: impl Into<String>,
    ) -> Result<Self, RelayError> {
        Ok(Self {
            client: super::http_client()?,
            base_url: base_url.into(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            assistant_id: assistant_id.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RelayError> {
        Self::new(
            &config.assistants_base_url,
            &config.twilio_account_sid,
            &config.twilio_auth_token,
            &config.assistant_id,
        )
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v1/Assistants/{}/Messages",
            self.base_url.trim_end_matches('/'),
            self.assistant_id
        )
    }
}

#[async_trait]
impl AssistantClient for TwilioAssistantClient {
    async fn create_message(
        &self,
        message: &MessageConfig,
    ) -> Result<AssistantMessage, RelayError> {
        tracing::debug!(
            identity = %redact_email(&message.identity),
            has_session = message.session_id.is_some(),
            "Creating assistant message"
        );

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .json(message)
            .send()
            .await
            .map_err(|e| {
                RelayError::Assistant(AssistantApiError {
                    message: format!("Assistant request failed: {}", e),
                    ..Default::default()
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed: Option<TwilioErrorBody> = serde_json::from_str(&text).ok();

            let error = match parsed {
                Some(body) => AssistantApiError {
                    message: body
                        .message
                        .unwrap_or_else(|| format!("Assistant API returned {}", status)),
                    status: body.status.or(Some(status.as_u16())),
                    code: body.code,
                    more_info: body.more_info,
                },
                None => AssistantApiError {
                    message: format!("Assistant API returned {}: {}", status, text),
                    status: Some(status.as_u16()),
                    ..Default::default()
                },
            };

            return Err(RelayError::Assistant(error));
        }

        response.json::<AssistantMessage>().await.map_err(|e| {
            RelayError::Assistant(AssistantApiError {
                message: format!("Failed to decode assistant response: {}", e),
                status: Some(status.as_u16()),
                ..Default::default()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TwilioAssistantClient {
        TwilioAssistantClient::new(server.uri(), "AC123", "token", "aia_asst_1").unwrap()
    }

    fn message() -> MessageConfig {
        MessageConfig::reply(
            "email:jane@example.com".to_string(),
            "Tuesday works".to_string(),
            "https://relay.twil.io/backend/log-sessions".to_string(),
            "email:jane@example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_message_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/Assistants/aia_asst_1/Messages"))
            .and(header_exists("authorization"))
            .and(body_partial_json(serde_json::json!({
                "identity": "email:jane@example.com",
                "session_id": "email:jane@example.com",
                "mode": "email"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Success",
                "session_id": "webhook:email:jane@example.com",
                "account_sid": "AC123",
                "body": "Tuesday works",
                "flagged": false,
                "aborted": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).create_message(&message()).await.unwrap();
        assert_eq!(result.status.as_deref(), Some("Success"));
        assert_eq!(result.account_sid.as_deref(), Some("AC123"));
    }

    #[tokio::test]
    async fn test_create_message_twilio_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/Assistants/aia_asst_1/Messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": 20003,
                "message": "Authenticate",
                "more_info": "https://www.twilio.com/docs/errors/20003",
                "status": 401
            })))
            .mount(&server)
            .await;

        let err = client(&server).create_message(&message()).await.unwrap_err();
        match err {
            RelayError::Assistant(api) => {
                assert_eq!(api.message, "Authenticate");
                assert_eq!(api.code, Some(20003));
                assert_eq!(api.status, Some(401));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_message_non_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server).create_message(&message()).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("502"));
    }
}
