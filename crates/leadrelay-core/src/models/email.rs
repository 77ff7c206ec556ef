/// Email domain models shared by email providers
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use typed_builder::TypedBuilder;

/// Caller-supplied options for an outbound email
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendOptions {
    /// Message id being replied to; turns the email into a threaded reply
    #[serde(default)]
    pub last_message_id: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Provider-agnostic outbound envelope
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct OutboundEmail {
    #[builder(setter(into))]
    pub to: String,
    #[builder(setter(into))]
    pub from: String,
    #[builder(setter(into))]
    pub subject: String,
    #[builder(setter(into))]
    pub text: String,
    #[builder(setter(into))]
    pub html: String,
    #[builder(default)]
    pub reply_to: Option<String>,
    #[builder(default)]
    pub headers: BTreeMap<String, String>,
}

/// Normalized result of a send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub status_code: u16,
}

/// Inbound parse webhook payload as posted by the email vendor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundPayload {
    #[serde(default)]
    pub headers: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Thread-linkage headers of an inbound email
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadData {
    pub references: Option<String>,
    pub in_reply_to: Option<String>,
}

/// Normalized inbound email
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundEmail {
    pub message_id: Option<String>,
    pub from_email: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub subject: String,
    pub headers: String,
    pub thread_data: ThreadData,
}
