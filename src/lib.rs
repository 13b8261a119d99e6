//! Conversation Transformer - turns raw LLM chat transcripts into display turns
//!
//! This library converts a provider chat log (OpenAI Chat Completions dialect)
//! into the normalized sequence of turns a chat UI renders:
//!
//! - **Role Normalization**: system prompts dropped, `null` content becomes `""`
//! - **Tool Call Splitting**: assistant text and each tool call become separate turns
//! - **Result Pairing**: `tool` messages settle their call by `tool_call_id`
//! - **Error Tolerance**: malformed or orphaned entries degrade to diagnostics, never panics
//!
//! # Architecture
//!
//! The codebase is organized into three layers:
//!
//! - [`transformer`]: the pure transcript-to-display mapping and its types
//! - [`services`]: transcript decoding from JSON documents, files and readers
//! - [`core`]: configuration, errors and logging setup
//!
//! # Example
//!
//! ```
//! use conversation_transformer::transformer::{ConversationTransformer, RawMessage};
//!
//! let turns = ConversationTransformer::new().transform(&[RawMessage::user("Hello")]);
//! assert_eq!(turns[0].content, "Hello");
//! ```

pub mod core;
pub mod services;
pub mod transformer;

// Re-export commonly used types for convenience
pub use crate::core::{AppConfig, AppError, Result};
pub use services::Transcript;
pub use transformer::{
    ConversationTransformer, Diagnostic, DiagnosticLevel, DisplayRole, DisplayTurn, RawMessage,
    ToolCallDisplay, ToolCallRequest, ToolCallStatus, Transformed,
};
