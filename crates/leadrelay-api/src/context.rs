/// App Context - shared state for all webhook handlers
use lambda_http::Error;
use leadrelay_core::Config;
use leadrelay_core::services::{
    AssistantClient, DynamoDbSessionStore, EmailProvider, SendGridProvider, SessionStore,
    TwilioAssistantClient,
};
use leadrelay_core::{Relay, RelayError};
use std::sync::Arc;

use crate::auth::WebhookAuth;
use crate::error::ApiError;

/// Long-lived clients built once per Lambda cold start
pub struct AppContext {
    /// Lead relay (assistant client + session lookup)
    pub relay: Relay,

    /// Email provider used for outbound replies and inbound parsing
    pub email: Arc<dyn EmailProvider>,

    /// Session store shared with the relay
    pub sessions: Arc<dyn SessionStore>,

    /// Secrets for Twilio signature and Inbound Parse credential checks
    pub auth: WebhookAuth,

    /// Include upstream diagnostics in error responses
    pub development: bool,
}

impl AppContext {
    /// Create a new context from the environment
    pub async fn new() -> Result<Arc<Self>, Error> {
        let config = Config::from_env()?;

        let aws_config = aws_config::load_from_env().await;
        let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);

        let sessions: Arc<dyn SessionStore> = Arc::new(DynamoDbSessionStore::new(
            dynamodb_client,
            &config.sessions_table,
        ));
        let assistant: Arc<dyn AssistantClient> =
            Arc::new(TwilioAssistantClient::from_config(&config)?);
        let email: Arc<dyn EmailProvider> = Arc::new(SendGridProvider::from_config(&config)?);

        Ok(Arc::new(Self::from_parts(
            assistant,
            sessions,
            email,
            config.webhook_url()?.to_string(),
            WebhookAuth::from_config(&config)?,
            config.is_development(),
        )))
    }

    /// Assemble a context from already-built services
    pub fn from_parts(
        assistant: Arc<dyn AssistantClient>,
        sessions: Arc<dyn SessionStore>,
        email: Arc<dyn EmailProvider>,
        webhook_url: String,
        auth: WebhookAuth,
        development: bool,
    ) -> Self {
        Self {
            relay: Relay::new(assistant, Arc::clone(&sessions), webhook_url),
            email,
            sessions,
            auth,
            development,
        }
    }

    /// Wraps a relay failure, attaching diagnostics in development mode
    pub fn api_error(&self, error: RelayError) -> ApiError {
        ApiError::relay(error, self.development)
    }
}
