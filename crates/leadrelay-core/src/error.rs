/// Error types for the Leadrelay system
use serde::Serialize;
use thiserror::Error;

/// Failure reported by the assistant API
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AssistantApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl std::fmt::Display for AssistantApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Error, Debug)]
pub enum RelayError {
    /// Rejected caller input; the message is returned to the caller verbatim
    #[error("{0}")]
    Validation(String),

    #[error("Failed to parse inbound email: {0}")]
    EmailParsing(String),

    #[error("Failed to send email: {0}")]
    EmailDelivery(String),

    /// Carries the assistant API's own error message
    #[error("{0}")]
    Assistant(AssistantApiError),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream failure worth another attempt (throttling, 5xx, network)
    #[error("Transient upstream error: {0}")]
    Transient(String),
}

impl RelayError {
    /// Determines if an error is retriable
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Storage(_) => true,
            Self::Transient(_) => true,
            Self::Validation(_) => false,
            Self::EmailParsing(_) => false,
            Self::EmailDelivery(_) => false,
            Self::Assistant(_) => false,
            Self::Config(_) => false,
        }
    }

    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::EmailParsing(_))
    }

    /// HTTP status the webhook responds with for this error
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Short machine-readable name of the error variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::EmailParsing(_) => "email_parsing",
            Self::EmailDelivery(_) => "email_delivery",
            Self::Assistant(_) => "assistant",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Transient(_) => "transient",
        }
    }
}
