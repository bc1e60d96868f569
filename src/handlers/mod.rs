// Audio API HTTP handlers
//
// This module contains the HTTP handlers for the audio API.
// It provides the interface between HTTP requests and the audio collaborators.

pub mod authentication;
pub mod form;
pub mod routes;

// Re-export handlers for easier access
pub use self::routes::{duration, health, index, transcribe};
// Re-export authentication middleware
pub use self::authentication::Authentication;
