//! Application layer for the node graph.

pub mod loader;
