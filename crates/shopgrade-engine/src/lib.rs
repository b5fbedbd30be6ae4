//! shopgrade engine - orchestration layer
//!
//! Coordinates the core domain logic with the filesystem store to answer
//! diff previews and run upgrade publishes, including the external build
//! and deploy steps.

pub mod commands;
pub mod config;

pub use commands::engine_command::{Engine, EngineCommand, EngineCommandResult};
pub use config::EngineConfig;
