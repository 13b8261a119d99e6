//! Transcript loading.
//!
//! Accepts either a bare JSON array of messages or a chat-completions request
//! body (`{"messages": [...]}`). Entries are decoded one at a time so a single
//! malformed entry is skipped with a warning instead of rejecting the whole
//! conversation.

use crate::core::{AppError, Result};
use crate::transformer::{ConversationTransformer, Diagnostic, RawMessage, Transformed};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// A decoded transcript plus the entries that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub messages: Vec<RawMessage>,
    pub skipped: Vec<Diagnostic>,
    /// Position of each kept message in the source document.
    source_indices: Vec<usize>,
}

impl Transcript {
    /// Decode a transcript from a JSON document.
    pub fn from_value(document: Value) -> Result<Self> {
        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut body) => match body.remove("messages") {
                Some(Value::Array(entries)) => entries,
                Some(_) => {
                    return Err(AppError::InvalidTranscript(
                        "'messages' must be an array".to_string(),
                    ))
                }
                None => {
                    return Err(AppError::InvalidTranscript(
                        "object has no 'messages' field".to_string(),
                    ))
                }
            },
            other => {
                return Err(AppError::InvalidTranscript(format!(
                    "expected an array or an object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut transcript = Transcript::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<RawMessage>(entry) {
                Ok(message) => {
                    transcript.messages.push(message);
                    transcript.source_indices.push(index);
                }
                Err(e) => {
                    let diagnostic = Diagnostic::InvalidMessage {
                        message_index: index,
                        reason: e.to_string(),
                    };
                    diagnostic.log();
                    transcript.skipped.push(diagnostic);
                }
            }
        }

        tracing::debug!(
            messages = transcript.messages.len(),
            skipped = transcript.skipped.len(),
            "Transcript decoded"
        );

        Ok(transcript)
    }

    /// Decode a transcript from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Read and decode a transcript file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Read and decode a transcript from any reader (e.g. stdin). `label`
    /// names the source in I/O errors.
    pub fn from_reader(mut reader: impl Read, label: &str) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| AppError::io(label, e))?;
        Self::from_json_str(&content)
    }

    /// Run the transformer. Skipped entries are reported ahead of the
    /// transformer's own diagnostics, and every diagnostic indexes into the
    /// source document rather than the filtered message list.
    pub fn transform(&self, transformer: &ConversationTransformer) -> Transformed {
        let mut transformed = transformer.transform_with_diagnostics(&self.messages);
        for diagnostic in &mut transformed.diagnostics {
            let index = diagnostic.message_index_mut();
            if let Some(source_index) = self.source_indices.get(*index) {
                *index = *source_index;
            }
        }
        if !self.skipped.is_empty() {
            let mut diagnostics = self.skipped.clone();
            diagnostics.append(&mut transformed.diagnostics);
            transformed.diagnostics = diagnostics;
        }
        transformed
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
