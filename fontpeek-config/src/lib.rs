//! Configuration system for the fontpeek font previewer.
//!
//! This crate provides configuration loading and default values:
//!
//! - Preview settings (sample text, point size, chunking)
//! - Window geometry and asset locations
//! - Logging level and log file location
//!
//! The configuration file is optional input only; fontpeek never writes it.

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::LogLevel;
