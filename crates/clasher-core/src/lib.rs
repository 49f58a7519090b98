//! Domain layer for Clasher.
//!
//! Holds the session record, payload types, configuration models, the error
//! type and the client traits implemented by `clasher-interaction`.

pub mod animation;
pub mod assistant;
pub mod config;
pub mod error;
pub mod export;
pub mod media;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{ClasherError, GuardViolation};
