/// Conversation session records
use crate::constants::WEBHOOK_SESSION_PREFIX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assistant session bound to a conversation identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    /// Session id as delivered by the assistant webhook (may carry `webhook:`)
    pub session_id: String,
    /// Id of the last email in the thread, used for reply headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            session_id: session_id.into(),
            last_message_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Session id in the form the assistant API expects
    pub fn assistant_session_id(&self) -> &str {
        self.session_id
            .strip_prefix(WEBHOOK_SESSION_PREFIX)
            .unwrap_or(&self.session_id)
    }
}
