/// SendGrid email provider
use crate::config::Config;
use crate::constants::{DEFAULT_EMAIL_SUBJECT, REPLY_SUBJECT_PREFIX, SENDGRID_MESSAGE_ID_HEADER};
use crate::error::RelayError;
use crate::models::{
    InboundEmail, InboundPayload, OutboundEmail, SendOptions, SendResult, ThreadData,
    email_from_identity,
};
use crate::services::email::EmailProvider;
use crate::utils::logging::redact_email;
use crate::utils::retry::{Backoff, retry_sendgrid};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

static MESSAGE_ID_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Message-ID:\s*<([^>]+)>").expect("valid regex"));
static REFERENCES_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)References:\s*<([^>]+)>").expect("valid regex"));
static IN_REPLY_TO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)In-Reply-To:\s*<([^>]+)>").expect("valid regex"));
static ANGLE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]+)>").expect("valid regex"));

pub struct SendGridProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sender_email: String,
    backoff: Backoff,
}

impl SendGridProvider {
    pub fn new(
        api_key: impl Into<String>,
        sender_email: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let api_key = api_key.into();
        let sender_email = sender_email.into();

        if api_key.is_empty() || sender_email.is_empty() {
            return Err(RelayError::Config(
                "SendGrid API key and sender email are required".to_string(),
            ));
        }

        Ok(Self {
            client: super::http_client()?,
            base_url: base_url.into(),
            api_key,
            sender_email,
            backoff: Backoff::default(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RelayError> {
        Self::new(
            &config.sendgrid_api_key,
            &config.sendgrid_sender_email,
            &config.sendgrid_base_url,
        )
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Builds the outbound envelope, adding reply threading when requested
    pub fn compose(
        &self,
        to: &str,
        body: &str,
        subject: Option<&str>,
        options: &SendOptions,
    ) -> OutboundEmail {
        let mut subject = subject
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_EMAIL_SUBJECT)
            .to_string();
        let mut headers = options.headers.clone();

        if let Some(last_message_id) = options.last_message_id.as_deref() {
            if !subject.to_lowercase().starts_with("re:") {
                subject = format!("{}{}", REPLY_SUBJECT_PREFIX, subject);
            }
            let reference = format!("<{}>", last_message_id);
            headers.insert("In-Reply-To".to_string(), reference.clone());
            headers.insert("References".to_string(), reference);
        }

        OutboundEmail::builder()
            .to(email_from_identity(to))
            .from(self.sender_email.as_str())
            .subject(subject)
            .text(body)
            .html(format!("<div>{}</div>", ammonia::clean(body)))
            .reply_to(options.reply_to.clone())
            .headers(headers)
            .build()
    }

    fn mail_send_url(&self) -> String {
        format!("{}/v3/mail/send", self.base_url.trim_end_matches('/'))
    }

    async fn post_mail(&self, payload: &Value) -> Result<SendResult, RelayError> {
        let response = self
            .client
            .post(self.mail_send_url())
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| RelayError::Transient(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let message_id = response
                .headers()
                .get(SENDGRID_MESSAGE_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            return Ok(SendResult {
                success: true,
                message_id,
                status_code: status.as_u16(),
            });
        }

        let text = response.text().await.unwrap_or_default();
        let detail = format!("SendGrid returned {}: {}", status, text);
        if status.as_u16() == 429 || status.is_server_error() {
            Err(RelayError::Transient(detail))
        } else {
            Err(RelayError::EmailDelivery(detail))
        }
    }
}

/// SendGrid v3 `mail/send` request body
pub fn sendgrid_payload(email: &OutboundEmail) -> Value {
    let mut payload = json!({
        "personalizations": [{ "to": [{ "email": email.to }] }],
        "from": { "email": email.from },
        "subject": email.subject,
        "content": [
            { "type": "text/plain", "value": email.text },
            { "type": "text/html", "value": email.html },
        ],
    });

    if let Some(reply_to) = &email.reply_to {
        payload["reply_to"] = json!({ "email": reply_to });
    }
    if !email.headers.is_empty() {
        payload["headers"] = json!(email.headers);
    }

    payload
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send(
        &self,
        to: &str,
        body: &str,
        subject: Option<&str>,
        options: &SendOptions,
    ) -> Result<SendResult, RelayError> {
        let email = self.compose(to, body, subject, options);
        let payload = &sendgrid_payload(&email);

        let result = retry_sendgrid(&self.backoff, move || self.post_mail(payload)).await;

        match &result {
            Ok(sent) => tracing::info!(
                to = %redact_email(&email.to),
                message_id = ?sent.message_id,
                threaded = options.last_message_id.is_some(),
                "Sent email via SendGrid"
            ),
            Err(e) => tracing::error!(
                to = %redact_email(&email.to),
                error = %e,
                "Error sending email"
            ),
        }

        result
    }

    fn parse_inbound(&self, payload: &InboundPayload) -> Result<InboundEmail, RelayError> {
        let headers = payload
            .headers
            .as_deref()
            .ok_or_else(|| RelayError::EmailParsing("missing headers".to_string()))?;
        let from = payload
            .from
            .as_deref()
            .ok_or_else(|| RelayError::EmailParsing("missing from".to_string()))?;

        let capture = |re: &Regex, text: &str| {
            re.captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };

        let from_email = capture(&ANGLE_ADDRESS, from).unwrap_or_else(|| from.to_string());

        Ok(InboundEmail {
            message_id: capture(&MESSAGE_ID_HEADER, headers),
            from_email,
            text: payload.text.clone(),
            html: payload.html.clone(),
            subject: payload.subject.clone().unwrap_or_default(),
            headers: headers.to_string(),
            thread_data: ThreadData {
                references: capture(&REFERENCES_HEADER, headers),
                in_reply_to: capture(&IN_REPLY_TO_HEADER, headers),
            },
        })
    }
}
