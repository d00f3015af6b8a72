//! VideoAsk Core: shared playback abstractions.
//!
//! This crate defines the traits and types that the graph, playback and host
//! crates depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod transport;
