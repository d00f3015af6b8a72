//! VideoAsk: branching node graph.
//!
//! Responsible for the authored node and question model, boundary
//! validation of node files, and resolving navigation decisions against the
//! loaded graph.

pub mod application;
pub mod domain;
