//! Application layer for playback.

pub mod clock;
pub mod command_handlers;
pub mod driver;
