/// Webhook endpoint modules
pub mod assistant;
pub mod health;
pub mod inbound;
pub mod sessions;
