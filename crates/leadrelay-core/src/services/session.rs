/// Session persistence keyed by conversation identity
use crate::error::RelayError;
use crate::models::Session;
use crate::utils::logging::redact_email;
use crate::utils::retry::retry_dynamodb;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session recorded for `identity`, if any
    async fn get_session(&self, identity: &str) -> Result<Option<Session>, RelayError>;

    /// Creates or replaces the session for `session.identity`
    async fn put_session(&self, session: &Session) -> Result<(), RelayError>;
}

/// DynamoDB-backed session store
///
/// Items are keyed by the `identity` partition key.
pub struct DynamoDbSessionStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbSessionStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn session_from_item(
        identity: &str,
        item: &HashMap<String, AttributeValue>,
    ) -> Result<Session, RelayError> {
        let string_attr = |name: &str| item.get(name).and_then(|v| v.as_s().ok()).cloned();

        let session_id = string_attr("session_id").ok_or_else(|| {
            RelayError::Storage(format!(
                "Session record for {} has no session_id",
                redact_email(identity)
            ))
        })?;

        let updated_at = string_attr("updated_at")
            .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(Session {
            identity: identity.to_string(),
            session_id,
            last_message_id: string_attr("last_message_id"),
            updated_at,
        })
    }
}

#[async_trait]
impl SessionStore for DynamoDbSessionStore {
    async fn get_session(&self, identity: &str) -> Result<Option<Session>, RelayError> {
        let output = retry_dynamodb("dynamodb_get_session", || async move {
            self.client
                .get_item()
                .table_name(&self.table_name)
                .key("identity", AttributeValue::S(identity.to_string()))
                .send()
                .await
                .map_err(|e| RelayError::Storage(format!("DynamoDB get_item failed: {}", e)))
        })
        .await?;

        match output.item() {
            Some(item) => {
                let session = Self::session_from_item(identity, item)?;
                debug!(identity = %redact_email(identity), "Session found");
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn put_session(&self, session: &Session) -> Result<(), RelayError> {
        let mut item = HashMap::from([
            (
                "identity".to_string(),
                AttributeValue::S(session.identity.clone()),
            ),
            (
                "session_id".to_string(),
                AttributeValue::S(session.session_id.clone()),
            ),
            (
                "updated_at".to_string(),
                AttributeValue::S(session.updated_at.to_rfc3339()),
            ),
        ]);
        if let Some(last_message_id) = &session.last_message_id {
            item.insert(
                "last_message_id".to_string(),
                AttributeValue::S(last_message_id.clone()),
            );
        }

        let item = &item;
        retry_dynamodb("dynamodb_put_session", || async move {
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(item.clone()))
                .send()
                .await
                .map_err(|e| RelayError::Storage(format!("DynamoDB put_item failed: {}", e)))
        })
        .await
        .inspect_err(|e| {
            warn!(identity = %redact_email(&session.identity), error = %e, "Failed to store session")
        })?;

        debug!(identity = %redact_email(&session.identity), "Session stored");
        Ok(())
    }
}

/// In-memory session store for tests and local runs
pub struct InMemorySessionStore {
    store: tokio::sync::Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            store: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn with_sessions(sessions: impl IntoIterator<Item = Session>) -> Self {
        Self {
            store: tokio::sync::Mutex::new(
                sessions
                    .into_iter()
                    .map(|s| (s.identity.clone(), s))
                    .collect(),
            ),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_session(&self, identity: &str) -> Result<Option<Session>, RelayError> {
        Ok(self.store.lock().await.get(identity).cloned())
    }

    async fn put_session(&self, session: &Session) -> Result<(), RelayError> {
        self.store
            .lock()
            .await
            .insert(session.identity.clone(), session.clone());
        Ok(())
    }
}
