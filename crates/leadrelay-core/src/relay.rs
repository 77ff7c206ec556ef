/// Lead relay - forwards lead events and replies to the hosted assistant
use crate::error::RelayError;
use crate::models::{LeadEvent, MessageConfig, RelayOutcome, Session, email_identity};
use crate::services::{AssistantClient, SessionStore};
use crate::utils::logging::{redact_body, redact_email};
use crate::utils::validation::validate_email_address;
use std::sync::Arc;
use tracing::info;

pub struct Relay {
    assistant: Arc<dyn AssistantClient>,
    sessions: Arc<dyn SessionStore>,
    webhook_url: String,
}

impl Relay {
    pub fn new(
        assistant: Arc<dyn AssistantClient>,
        sessions: Arc<dyn SessionStore>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            assistant,
            sessions,
            webhook_url: webhook_url.into(),
        }
    }

    /// Validates a lead event, resolves its session and submits it to the assistant
    ///
    /// A reply in an existing session continues that session; otherwise a
    /// new-lead prompt opens a new conversation.
    #[tracing::instrument(name = "relay.send_to_assistant", skip(self, event))]
    pub async fn send_to_assistant(&self, event: &LeadEvent) -> Result<RelayOutcome, RelayError> {
        let email = event
            .email()
            .ok_or_else(|| RelayError::Validation("Missing required field: email".to_string()))?;
        validate_email_address(email)?;

        let identity = email_identity(email);
        let existing_session = self.sessions.get_session(&identity).await?;

        info!(webhook_url = %self.webhook_url, "Webhook URL being used");
        info!(
            identity = %redact_email(&identity),
            existing_session = existing_session.is_some(),
            "Checked for existing session"
        );

        let message = build_message_config(
            event,
            identity,
            existing_session.as_ref(),
            &self.webhook_url,
        )?;

        info!(
            identity = %redact_email(&message.identity),
            session_id = ?message.session_id,
            mode = %message.mode,
            body = %redact_body(&message.body),
            "Message config prepared"
        );

        let reply = self.assistant.create_message(&message).await?;

        info!(
            status = ?reply.status,
            session_id = ?reply.session_id,
            flagged = ?reply.flagged,
            aborted = ?reply.aborted,
            "Assistant response"
        );

        Ok(reply.into())
    }
}

/// Chooses between a session reply and a new-lead prompt
pub fn build_message_config(
    event: &LeadEvent,
    identity: String,
    session: Option<&Session>,
    webhook_url: &str,
) -> Result<MessageConfig, RelayError> {
    if let (Some(session), Some(response)) = (session, event.response()) {
        return Ok(MessageConfig::reply(
            identity,
            response.to_string(),
            webhook_url.to_string(),
            session.assistant_session_id().to_string(),
        ));
    }

    if let (Some(first_name), Some(area_code)) = (event.first_name(), event.area_code()) {
        return Ok(MessageConfig::new_conversation(
            identity,
            new_lead_prompt(first_name, area_code, event.interest()),
            webhook_url.to_string(),
        ));
    }

    Err(RelayError::Validation(
        "Invalid request: Must provide either response for existing conversation or new lead information (first_name and area_code)"
            .to_string(),
    ))
}

/// Prompt asking the assistant to write the first email to a new lead
pub fn new_lead_prompt(first_name: &str, area_code: &str, interest: Option<&str>) -> String {
    let extra = interest
        .map(|i| {
            format!(
                "They provided the following additional information: \"{}\".",
                i
            )
        })
        .unwrap_or_default();

    format!(
        "A new lead, named {}, was submitted and they are interested in properties in {}. {} Write an email to them with some property recommendations based on their interests and ask if they would like to schedule time with an Owl Home Agent.",
        first_name, area_code, extra
    )
}
