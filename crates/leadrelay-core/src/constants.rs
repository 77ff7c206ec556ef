/// Application constants
///
/// This module contains all hardcoded values used throughout the application.
/// Constants are organized by category for easy maintenance.
// ============================================================================
// Identity & Session Constants
// ============================================================================
/// Prefix of identities that address an email conversation
pub const EMAIL_IDENTITY_PREFIX: &str = "email:";

/// Prefix the assistant platform puts on session ids delivered via webhook
pub const WEBHOOK_SESSION_PREFIX: &str = "webhook:";

/// Conversation mode sent with every assistant message
pub const ASSISTANT_MODE: &str = "email";

/// Path of the function the assistant calls back with its replies
pub const LOG_SESSIONS_PATH: &str = "/backend/log-sessions";

// ============================================================================
// Email Constants
// ============================================================================

/// Subject used when the caller does not provide one
pub const DEFAULT_EMAIL_SUBJECT: &str = "Exciting New Homes, Just for You";

/// Prefix marking a reply subject
pub const REPLY_SUBJECT_PREFIX: &str = "Re: ";

/// Response header carrying the SendGrid message id
pub const SENDGRID_MESSAGE_ID_HEADER: &str = "x-message-id";

/// Maximum email address length (RFC 5321)
pub const MAX_EMAIL_ADDRESS_LENGTH: usize = 320;

// ============================================================================
// External Endpoints
// ============================================================================

/// Twilio AI Assistants API base URL
pub const TWILIO_ASSISTANTS_BASE_URL: &str = "https://assistants.twilio.com";

/// SendGrid v3 API base URL
pub const SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

/// Timeout applied to every outbound HTTP request in seconds
pub const HTTP_TIMEOUT_SECONDS: u64 = 30;

// ============================================================================
// Webhook Authentication
// ============================================================================

/// Header carrying Twilio's request signature
pub const TWILIO_SIGNATURE_HEADER: &str = "x-twilio-signature";

/// Query parameter Twilio adds with the hex SHA-256 of a non-form body
pub const TWILIO_BODY_HASH_PARAM: &str = "bodySHA256";

// ============================================================================
// Retry Configuration
// ============================================================================

/// Maximum number of retries for transient failures
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff in milliseconds
pub const RETRY_BASE_DELAY_MS: u64 = 200;

/// Upper bound for a single backoff delay in milliseconds
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Jitter factor applied to backoff delays (±10%)
pub const RETRY_JITTER_FACTOR: f64 = 0.1;

// ============================================================================
// Request Limits
// ============================================================================

/// Maximum accepted webhook body size (SendGrid inbound parse may carry attachments)
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;
