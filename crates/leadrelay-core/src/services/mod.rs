/// External service clients
pub mod assistant;
pub mod email;
pub mod sendgrid;
pub mod session;

pub use assistant::{AssistantClient, TwilioAssistantClient};
pub use email::EmailProvider;
pub use sendgrid::SendGridProvider;
pub use session::{DynamoDbSessionStore, InMemorySessionStore, SessionStore};

use crate::constants::HTTP_TIMEOUT_SECONDS;
use crate::error::RelayError;
use std::time::Duration;

/// Shared HTTP client settings for vendor APIs
pub(crate) fn http_client() -> Result<reqwest::Client, RelayError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
        .user_agent(concat!("leadrelay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RelayError::Config(format!("Failed to create HTTP client: {}", e)))
}
