/// Leadrelay Core - Shared library for the Leadrelay webhook functions
///
/// This crate contains the relay flow, the external service clients
/// (assistant, email provider, session store) and the utilities used by
/// the webhook Lambda.
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod relay;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::RelayError;
pub use relay::Relay;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
