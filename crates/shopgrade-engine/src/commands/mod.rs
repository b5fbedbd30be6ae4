//! Command orchestration layer.
//!
//! Coordinates core domain logic, the filesystem store and external
//! processes for the two operator actions: preview and publish.

pub mod engine_command;
pub mod preview;
pub mod publish;
pub mod runner;
