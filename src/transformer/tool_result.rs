//! Tool result marker grammar.
//!
//! The tool-execution layer reports results to the model as plain text in one
//! of two shapes:
//!
//! ```text
//! Tool "<name>" executed successfully:
//! <json payload>
//! (Execution time: <N>ms)
//! ```
//!
//! ```text
//! Tool "<name>" failed: <message>
//! ```
//!
//! Both directions live here so the producer and the parser cannot drift.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    /// Success marker. The execution-time trailer is optional so that
    /// truncated results still surface their payload.
    static ref SUCCESS_REGEX: Regex = Regex::new(
        r#"(?s)^Tool "(?P<name>[^"]*)" executed successfully:\s*(?P<payload>.*?)(?:\s*\(Execution time: (?P<ms>\d+)ms\))?\s*$"#
    )
    .unwrap();

    /// Failure marker.
    static ref FAILURE_REGEX: Regex =
        Regex::new(r#"(?s)^Tool "(?P<name>[^"]*)" failed: (?P<message>.*)$"#).unwrap();
}

/// Parsed form of a tool result message.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success {
        tool_name: String,
        result: Value,
        execution_time_ms: Option<u64>,
    },
    Failure {
        tool_name: String,
        error: String,
    },
    /// Neither marker matched; the text is kept verbatim.
    Unrecognized { raw: String },
}

impl ToolOutcome {
    /// Tool name reported inside the marker, if any.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            ToolOutcome::Success { tool_name, .. } | ToolOutcome::Failure { tool_name, .. } => {
                Some(tool_name)
            }
            ToolOutcome::Unrecognized { .. } => None,
        }
    }
}

/// Parse tool result text into a typed outcome. Never fails.
pub fn parse_tool_result(content: &str) -> ToolOutcome {
    if let Some(caps) = SUCCESS_REGEX.captures(content) {
        let payload = caps.name("payload").map(|m| m.as_str()).unwrap_or("");
        let execution_time_ms = caps.name("ms").and_then(|m| m.as_str().parse::<u64>().ok());
        return ToolOutcome::Success {
            tool_name: caps["name"].to_string(),
            result: parse_payload(payload),
            execution_time_ms,
        };
    }

    if let Some(caps) = FAILURE_REGEX.captures(content) {
        return ToolOutcome::Failure {
            tool_name: caps["name"].to_string(),
            error: caps["message"].to_string(),
        };
    }

    ToolOutcome::Unrecognized {
        raw: content.to_string(),
    }
}

/// Best-effort JSON decode; non-JSON payloads are returned as a string.
fn parse_payload(payload: &str) -> Value {
    let trimmed = payload.trim();
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Render the success marker for a tool result.
pub fn format_tool_success(tool_name: &str, result: &Value, execution_time_ms: u64) -> String {
    let payload = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    format!(
        "Tool \"{}\" executed successfully:\n{}\n(Execution time: {}ms)",
        tool_name, payload, execution_time_ms
    )
}

/// Render the failure marker for a tool result.
pub fn format_tool_failure(tool_name: &str, error: &str) -> String {
    format!("Tool \"{}\" failed: {}", tool_name, error)
}
