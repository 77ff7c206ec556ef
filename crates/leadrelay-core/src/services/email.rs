/// Email provider abstraction
///
/// Callers send and receive email through this trait so the relay stays
/// agnostic to the vendor behind it.
use crate::error::RelayError;
use crate::models::{InboundEmail, InboundPayload, SendOptions, SendResult};
use async_trait::async_trait;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Sends `body` to `to` (an address or an `email:` identity)
    ///
    /// `subject` falls back to the provider default. Setting
    /// `options.last_message_id` threads the email as a reply.
    async fn send(
        &self,
        to: &str,
        body: &str,
        subject: Option<&str>,
        options: &SendOptions,
    ) -> Result<SendResult, RelayError>;

    /// Normalizes an inbound webhook payload
    fn parse_inbound(&self, payload: &InboundPayload) -> Result<InboundEmail, RelayError>;

    /// Thread anchor: References, else In-Reply-To, else the message's own id
    fn thread_id(&self, email: &InboundEmail) -> Option<String> {
        email
            .thread_data
            .references
            .clone()
            .or_else(|| email.thread_data.in_reply_to.clone())
            .or_else(|| email.message_id.clone())
    }
}
