/// Configuration - loads runtime settings from environment variables
use crate::constants::{LOG_SESSIONS_PATH, SENDGRID_BASE_URL, TWILIO_ASSISTANTS_BASE_URL};
use crate::error::RelayError;
use url::Url;

/// Deployment environment; development mode exposes error diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub assistant_id: String,
    pub functions_domain: String,
    pub sendgrid_api_key: String,
    pub sendgrid_sender_email: String,
    pub sessions_table: String,
    /// Basic auth credentials embedded in the Inbound Parse webhook URL
    pub inbound_parse_username: String,
    pub inbound_parse_password: String,
    pub environment: Environment,
    pub assistants_base_url: String,
    pub sendgrid_base_url: String,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RelayError::Config(format!("Missing {}", key)))
        };

        let config = Self {
            twilio_account_sid: required("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: required("TWILIO_AUTH_TOKEN")?,
            assistant_id: required("ASSISTANT_ID")?,
            functions_domain: required("FUNCTIONS_DOMAIN")?,
            sendgrid_api_key: required("SENDGRID_API_KEY")?,
            sendgrid_sender_email: required("SENDGRID_SENDER_EMAIL")?,
            sessions_table: required("SESSIONS_TABLE")?,
            inbound_parse_username: required("INBOUND_PARSE_USERNAME")?,
            inbound_parse_password: required("INBOUND_PARSE_PASSWORD")?,
            environment: lookup("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            assistants_base_url: lookup("TWILIO_ASSISTANTS_BASE_URL")
                .unwrap_or_else(|| TWILIO_ASSISTANTS_BASE_URL.to_string()),
            sendgrid_base_url: lookup("SENDGRID_BASE_URL")
                .unwrap_or_else(|| SENDGRID_BASE_URL.to_string()),
        };

        config.webhook_url()?;
        tracing::info!(
            environment = ?config.environment,
            functions_domain = %config.functions_domain,
            "Configuration loaded"
        );

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// URL the assistant calls back with its replies
    pub fn webhook_url(&self) -> Result<Url, RelayError> {
        webhook_url(&self.functions_domain)
    }

    /// Public origin Twilio signs webhook URLs against, without a trailing slash
    pub fn public_base_url(&self) -> Result<String, RelayError> {
        let url = public_base_url(&self.functions_domain)?;
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

fn public_base_url(functions_domain: &str) -> Result<Url, RelayError> {
    Url::parse(&format!("https://{}", functions_domain)).map_err(|e| {
        RelayError::Config(format!(
            "Invalid FUNCTIONS_DOMAIN '{}': {}",
            functions_domain, e
        ))
    })
}

/// Builds `https://<domain>/backend/log-sessions`
pub fn webhook_url(functions_domain: &str) -> Result<Url, RelayError> {
    public_base_url(functions_domain)?
        .join(LOG_SESSIONS_PATH)
        .map_err(|e| RelayError::Config(format!("Invalid webhook URL: {}", e)))
}
