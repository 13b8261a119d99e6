//! OpenAI chat transcript types.
//!
//! The raw message log the transformer consumes is the OpenAI Chat Completions
//! dialect: role-tagged messages where assistant turns may carry `tool_calls`
//! and `tool` turns carry the matching `tool_call_id`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Message Types
// ============================================================================

/// One entry of a provider transcript, tagged by `role`.
///
/// Each variant carries only the fields that are meaningful for its role;
/// unknown extra fields (e.g. `name`) are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RawMessage {
    System {
        #[serde(default)]
        content: Option<MessageContent>,
    },
    User {
        #[serde(default)]
        content: Option<MessageContent>,
    },
    Assistant {
        #[serde(default)]
        content: Option<MessageContent>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCallRequest>>,
    },
    Tool {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
        #[serde(default)]
        content: Option<MessageContent>,
    },
}

impl RawMessage {
    /// Create a system prompt message.
    pub fn system(content: impl Into<String>) -> Self {
        RawMessage::System {
            content: Some(MessageContent::Text(content.into())),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        RawMessage::User {
            content: Some(MessageContent::Text(content.into())),
        }
    }

    /// Create a plain assistant message without tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        RawMessage::Assistant {
            content: Some(MessageContent::Text(content.into())),
            tool_calls: None,
        }
    }

    /// Create an assistant message that requests tool calls.
    pub fn assistant_with_tool_calls(content: Option<&str>, calls: Vec<ToolCallRequest>) -> Self {
        RawMessage::Assistant {
            content: content.map(|text| MessageContent::Text(text.to_string())),
            tool_calls: Some(calls),
        }
    }

    /// Create a tool result message.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        RawMessage::Tool {
            tool_call_id: Some(tool_call_id.into()),
            content: Some(MessageContent::Text(content.into())),
        }
    }

    /// The role name as it appears on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            RawMessage::System { .. } => "system",
            RawMessage::User { .. } => "user",
            RawMessage::Assistant { .. } => "assistant",
            RawMessage::Tool { .. } => "tool",
        }
    }

    /// Message text with `null` normalized to an empty string.
    pub fn text(&self) -> String {
        let content = match self {
            RawMessage::System { content }
            | RawMessage::User { content }
            | RawMessage::Assistant { content, .. }
            | RawMessage::Tool { content, .. } => content,
        };
        content.as_ref().map(MessageContent::to_text).unwrap_or_default()
    }
}

// ============================================================================
// Content Types
// ============================================================================

/// OpenAI content can be string or array of content parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten to display text. Text parts are joined by newlines; other
    /// parts (images, audio) have no textual form and are dropped.
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Other => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// OpenAI content part for multimodal messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

// ============================================================================
// Tool Call Types
// ============================================================================

/// OpenAI tool call structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// OpenAI function call structure. `arguments` is JSON-encoded text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCallRequest {
    /// Create a function tool call.
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        ToolCallRequest {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}
