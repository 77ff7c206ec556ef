/// Lead webhook payload
use crate::constants::EMAIL_IDENTITY_PREFIX;
use crate::utils::validation::non_blank;
use serde::{Deserialize, Serialize};

/// Payload accepted by the send-to-assistant webhook
///
/// Either `response` (a reply in an existing conversation) or `first_name`
/// plus `area_code` (a new lead) must accompany `email`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadEvent {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub area_code: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
}

impl LeadEvent {
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    pub fn response(&self) -> Option<&str> {
        non_blank(self.response.as_deref())
    }

    pub fn first_name(&self) -> Option<&str> {
        non_blank(self.first_name.as_deref())
    }

    pub fn area_code(&self) -> Option<&str> {
        non_blank(self.area_code.as_deref())
    }

    pub fn interest(&self) -> Option<&str> {
        non_blank(self.interest.as_deref())
    }
}

/// Conversation identity of an email address (`email:<address>`)
pub fn email_identity(email: &str) -> String {
    format!("{}{}", EMAIL_IDENTITY_PREFIX, email)
}

/// Email address addressed by an identity; plain addresses pass through
pub fn email_from_identity(identity: &str) -> &str {
    identity
        .strip_prefix(EMAIL_IDENTITY_PREFIX)
        .unwrap_or(identity)
}
