//! Core functionality for the conversation transformer.
//!
//! This module contains the ambient pieces used around the transformer:
//! - Configuration management
//! - Error handling
//! - Logging setup

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, LoggingConfig, OutputConfig};
pub use error::{AppError, Result};
pub use logging::init_logging;
