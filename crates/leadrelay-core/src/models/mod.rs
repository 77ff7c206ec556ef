/// Data models for the Leadrelay system
pub mod assistant;
pub mod email;
pub mod lead;
pub mod session;

// Re-export commonly used types
pub use assistant::*;
pub use email::*;
pub use lead::*;
pub use session::*;
