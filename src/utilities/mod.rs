//! Shared utilities: configuration, error types and text helpers.

pub mod config;
pub mod errors;
pub mod string_utils;

pub use config::DialogosConfig;
pub use errors::{ChatError, ConfigError, GenerationError, StoreError};
