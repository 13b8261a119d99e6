//! Services built around the transformer.
//!
//! This module contains the pieces that feed the transformer from the
//! outside world, such as decoding transcript documents.

pub mod transcript_service;

// Re-export commonly used types
pub use transcript_service::Transcript;
