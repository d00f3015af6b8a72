//! Domain layer for playback.

pub mod commands;
pub mod events;
pub mod overlay;
pub mod progress;
pub mod scheduler;
pub mod session;
pub mod state;
