//! Session Module
//!
//! The async shell around the deterministic core: configuration, buzzer
//! fan-out and the 60 Hz game loop.

pub mod config;
pub mod hub;
pub mod runtime;

pub use config::{ConfigError, SessionConfig};
pub use hub::{BuzzerHub, KeyBindings};
pub use runtime::{spawn_session, SessionError, SessionHandle, SessionReport};
