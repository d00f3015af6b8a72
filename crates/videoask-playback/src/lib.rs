//! VideoAsk: branching playback synchronization engine.
//!
//! Tracks the active clip, reconciles polled progress against seeks,
//! arbitrates the audio overlay against the main video, and resolves
//! branching navigation, all on a single writer driven by deferred tasks.

pub mod application;
pub mod config;
pub mod domain;
