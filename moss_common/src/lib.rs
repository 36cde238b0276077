//! Common types for the MoSS workspace.
//!
//! This crate provides the attributed graph model, the search configuration
//! and the fixture molecules used across the workspace's tests.

mod config;
mod error;
pub mod graph;
mod test_cases;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::graph::*;
pub use crate::test_cases::*;
