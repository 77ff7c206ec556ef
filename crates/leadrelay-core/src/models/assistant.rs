/// Assistant API message models
use crate::constants::ASSISTANT_MODE;
use serde::{Deserialize, Serialize};

/// Message sent to the hosted assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageConfig {
    pub identity: String,
    pub body: String,
    pub webhook: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub mode: String,
}

impl MessageConfig {
    /// First message of a new conversation
    pub fn new_conversation(identity: String, body: String, webhook: String) -> Self {
        Self {
            identity,
            body,
            webhook,
            session_id: None,
            mode: ASSISTANT_MODE.to_string(),
        }
    }

    /// Reply within an existing assistant session
    pub fn reply(identity: String, body: String, webhook: String, session_id: String) -> Self {
        Self {
            session_id: Some(session_id),
            ..Self::new_conversation(identity, body, webhook)
        }
    }
}

/// Message resource returned by the assistant API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssistantMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(default)]
    pub aborted: Option<bool>,
    #[serde(default)]
    pub identity: Option<String>,
}

/// Result of relaying a lead event to the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelayOutcome {
    pub message_status: Option<String>,
    pub session_id: Option<String>,
    pub account_sid: Option<String>,
    pub body: Option<String>,
    pub flagged: Option<bool>,
    pub aborted: Option<bool>,
}

impl From<AssistantMessage> for RelayOutcome {
    fn from(message: AssistantMessage) -> Self {
        Self {
            message_status: message.status,
            session_id: message.session_id,
            account_sid: message.account_sid,
            body: message.body,
            flagged: message.flagged,
            aborted: message.aborted,
        }
    }
}

/// Callback the assistant posts to the log-sessions webhook
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantCallback {
    #[serde(rename = "Identity", default)]
    pub identity: Option<String>,
    #[serde(rename = "SessionId", default)]
    pub session_id: Option<String>,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

impl AssistantCallback {
    /// The assistant reports `Failed` when it could not produce a reply
    pub fn is_failed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("failed"))
    }
}
