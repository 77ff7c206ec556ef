/// Backoff for vendor calls (SendGrid mail send, DynamoDB session reads/writes)
use crate::constants::{MAX_RETRIES, RETRY_BASE_DELAY_MS, RETRY_JITTER_FACTOR, RETRY_MAX_DELAY_MS};
use crate::error::RelayError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Backoff {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_factor: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_MS)
    }
}

impl Backoff {
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
            jitter_factor: RETRY_JITTER_FACTOR,
        }
    }

    /// Wait before the retry following failed attempt `attempt` (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let capped = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(32))
            .min(self.max_delay_ms);
        let jitter = 1.0 + (rand::random::<f64>() * 2.0 - 1.0) * self.jitter_factor;

        Duration::from_millis((capped as f64 * jitter) as u64)
    }

    /// Runs `call` until it succeeds, fails permanently, or retries run out.
    /// The final error is returned as produced by `call`.
    pub async fn run<T, F, Fut>(&self, label: &'static str, mut call: F) -> Result<T, RelayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RelayError>>,
    {
        let mut attempt = 0;
        loop {
            let err = match call().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retriable() => return Err(err),
                Err(err) => err,
            };

            if attempt == self.max_retries {
                warn!(call = label, attempts = attempt + 1, error = %err, "Giving up");
                return Err(err);
            }

            let delay = self.delay(attempt);
            warn!(call = label, attempt, delay_ms = delay.as_millis() as u64, error = %err, "Retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Retries a SendGrid request. Throttling or 5xx that outlasts the backoff
/// surfaces as a delivery failure.
pub async fn retry_sendgrid<T, F, Fut>(backoff: &Backoff, call: F) -> Result<T, RelayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RelayError>>,
{
    backoff
        .run("sendgrid_mail_send", call)
        .await
        .map_err(|e| match e {
            RelayError::Transient(msg) => RelayError::EmailDelivery(msg),
            other => other,
        })
}

/// Retries a DynamoDB request with the default backoff
pub async fn retry_dynamodb<T, F, Fut>(label: &'static str, call: F) -> Result<T, RelayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RelayError>>,
{
    Backoff::default().run(label, call).await
}
