//! UI-ready display turns produced by the conversation transformer.

use super::tool_result::ToolOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a display turn. System prompts never reach the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayRole {
    User,
    Assistant,
}

impl std::fmt::Display for DisplayRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayRole::User => write!(f, "user"),
            DisplayRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// Lifecycle of a tool call as shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    Executing,
    Completed,
    Failed,
}

impl ToolCallStatus {
    /// Whether the call has reached a final state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ToolCallStatus::Executing)
    }
}

/// One chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTurn {
    pub role: DisplayRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallDisplay>,
}

impl DisplayTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        DisplayTurn {
            role: DisplayRole::User,
            content: content.into(),
            tool_call: None,
        }
    }

    /// Create an assistant text turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        DisplayTurn {
            role: DisplayRole::Assistant,
            content: content.into(),
            tool_call: None,
        }
    }

    /// Create an assistant turn for a tool call. Tool call turns carry no text.
    pub fn tool_call(tool_call: ToolCallDisplay) -> Self {
        DisplayTurn {
            role: DisplayRole::Assistant,
            content: String::new(),
            tool_call: Some(tool_call),
        }
    }
}

/// Tool call badge attached to an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallDisplay {
    pub tool_name: String,
    pub parameters: Value,
    pub status: ToolCallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Milliseconds reported by the tool executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallDisplay {
    /// A call that has been issued but has no result yet.
    pub fn executing(tool_name: impl Into<String>, parameters: Value) -> Self {
        ToolCallDisplay {
            tool_name: tool_name.into(),
            parameters,
            status: ToolCallStatus::Executing,
            result: None,
            execution_time: None,
            error: None,
        }
    }

    /// Move the call into its terminal state from a parsed tool result.
    pub fn apply(&mut self, outcome: ToolOutcome) {
        match outcome {
            ToolOutcome::Success {
                result,
                execution_time_ms,
                ..
            } => {
                self.status = ToolCallStatus::Completed;
                self.result = Some(result);
                self.execution_time = execution_time_ms;
                self.error = None;
            }
            ToolOutcome::Failure { error, .. } => {
                self.status = ToolCallStatus::Failed;
                self.error = Some(error);
                self.result = None;
                self.execution_time = None;
            }
            ToolOutcome::Unrecognized { raw } => {
                self.status = ToolCallStatus::Completed;
                self.result = Some(Value::String(raw));
                self.execution_time = None;
                self.error = None;
            }
        }
    }
}
