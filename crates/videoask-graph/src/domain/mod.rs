//! Domain layer for the node graph.

pub mod node;
pub mod resolver;
