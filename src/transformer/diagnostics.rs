//! Non-fatal anomalies recorded while transforming a transcript.

use thiserror::Error;

/// Severity channel of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticLevel {
    /// Structurally recoverable: the offending entry is dropped.
    Warning,
    /// Corrupt data: a safe default is substituted.
    Error,
}

/// A recoverable anomaly. `message_index` is the position in the input log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("Tool message missing tool_call_id: {raw}")]
    MissingToolCallId { message_index: usize, raw: String },

    #[error("No pending tool call found for tool_call_id: {tool_call_id}")]
    UnmatchedToolCallId {
        message_index: usize,
        tool_call_id: String,
    },

    #[error("Tool call id {tool_call_id} reused while still pending")]
    DuplicateToolCallId {
        message_index: usize,
        tool_call_id: String,
    },

    #[error("Failed to parse arguments for tool {tool_name}: {raw_arguments} ({reason})")]
    MalformedArguments {
        message_index: usize,
        tool_name: String,
        raw_arguments: String,
        reason: String,
    },

    #[error("Skipped invalid transcript entry {message_index}: {reason}")]
    InvalidMessage { message_index: usize, reason: String },
}

impl Diagnostic {
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            Diagnostic::MalformedArguments { .. } => DiagnosticLevel::Error,
            Diagnostic::MissingToolCallId { .. }
            | Diagnostic::UnmatchedToolCallId { .. }
            | Diagnostic::DuplicateToolCallId { .. }
            | Diagnostic::InvalidMessage { .. } => DiagnosticLevel::Warning,
        }
    }

    pub fn message_index(&self) -> usize {
        match self {
            Diagnostic::MissingToolCallId { message_index, .. }
            | Diagnostic::UnmatchedToolCallId { message_index, .. }
            | Diagnostic::DuplicateToolCallId { message_index, .. }
            | Diagnostic::MalformedArguments { message_index, .. }
            | Diagnostic::InvalidMessage { message_index, .. } => *message_index,
        }
    }

    pub(crate) fn message_index_mut(&mut self) -> &mut usize {
        match self {
            Diagnostic::MissingToolCallId { message_index, .. }
            | Diagnostic::UnmatchedToolCallId { message_index, .. }
            | Diagnostic::DuplicateToolCallId { message_index, .. }
            | Diagnostic::MalformedArguments { message_index, .. }
            | Diagnostic::InvalidMessage { message_index, .. } => message_index,
        }
    }

    /// Emit through `tracing` on the channel matching [`Diagnostic::level`].
    pub fn log(&self) {
        match self.level() {
            DiagnosticLevel::Warning => {
                tracing::warn!(message_index = self.message_index(), "{}", self)
            }
            DiagnosticLevel::Error => {
                tracing::error!(message_index = self.message_index(), "{}", self)
            }
        }
    }
}
