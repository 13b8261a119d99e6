//! Conversation transformer.
//!
//! Converts a raw provider transcript into the display turns the chat UI
//! renders. Every tool call becomes its own assistant turn, created in the
//! `executing` state and later settled by the matching `tool` message.
//!
//! ```text
//! system ─────────────► (dropped)
//! user ───────────────► [user turn]
//! assistant ──────────► [assistant text turn]? + [tool call turn] × N
//!                                                     ▲
//! tool (tool_call_id) ────── settles in place ────────┘
//! ```
//!
//! The transformer never fails. Anomalies are recorded as [`Diagnostic`]s and
//! logged: join-key problems on the warning channel, corrupt tool arguments on
//! the error channel.

pub mod diagnostics;
pub mod display;
pub mod openai;
pub mod tool_result;

use serde_json::{json, Value};
use std::collections::HashMap;

pub use diagnostics::{Diagnostic, DiagnosticLevel};
pub use display::{DisplayRole, DisplayTurn, ToolCallDisplay, ToolCallStatus};
pub use openai::{ContentPart, FunctionCall, MessageContent, RawMessage, ToolCallRequest};
pub use tool_result::{format_tool_failure, format_tool_success, parse_tool_result, ToolOutcome};

// ============================================================================
// Transform Output
// ============================================================================

/// Result of a single transform pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    pub turns: Vec<DisplayTurn>,
    pub diagnostics: Vec<Diagnostic>,
    /// Calls still awaiting a result when the log ended, in emission order.
    pub pending_call_ids: Vec<String>,
}

impl Transformed {
    /// Diagnostics on the warning channel.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level() == DiagnosticLevel::Warning)
    }

    /// Diagnostics on the error channel.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level() == DiagnosticLevel::Error)
    }
}

// ============================================================================
// Conversation Transformer
// ============================================================================

/// Stateless transcript-to-display transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationTransformer;

impl ConversationTransformer {
    /// Create a new conversation transformer.
    pub fn new() -> Self {
        ConversationTransformer
    }

    /// Transform a transcript into display turns.
    pub fn transform(&self, messages: &[RawMessage]) -> Vec<DisplayTurn> {
        self.transform_with_diagnostics(messages).turns
    }

    /// Transform a transcript, also returning what was recorded along the way.
    pub fn transform_with_diagnostics(&self, messages: &[RawMessage]) -> Transformed {
        let mut state = TransformState::default();

        for (index, message) in messages.iter().enumerate() {
            match message {
                RawMessage::System { .. } => {}
                RawMessage::User { .. } => {
                    state.turns.push(DisplayTurn::user(message.text()));
                }
                RawMessage::Assistant { tool_calls, .. } => {
                    let content = message.text();
                    if !content.is_empty() {
                        state.turns.push(DisplayTurn::assistant(content));
                    }
                    for call in tool_calls.iter().flatten() {
                        state.open_tool_call(index, call);
                    }
                }
                RawMessage::Tool { tool_call_id, .. } => {
                    state.settle_tool_call(index, message, tool_call_id.as_deref());
                }
            }
        }

        state.finish()
    }
}

/// Per-call scratch state. Dropped when the call returns.
#[derive(Default)]
struct TransformState {
    turns: Vec<DisplayTurn>,
    /// Tool call id -> index of its turn in `turns`.
    pending: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl TransformState {
    fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    fn open_tool_call(&mut self, message_index: usize, call: &ToolCallRequest) {
        let parameters = match serde_json::from_str::<Value>(&call.function.arguments) {
            Ok(parameters) => parameters,
            Err(e) => {
                self.record(Diagnostic::MalformedArguments {
                    message_index,
                    tool_name: call.function.name.clone(),
                    raw_arguments: call.function.arguments.clone(),
                    reason: e.to_string(),
                });
                json!({})
            }
        };

        self.turns.push(DisplayTurn::tool_call(ToolCallDisplay::executing(
            call.function.name.clone(),
            parameters,
        )));

        let turn_index = self.turns.len() - 1;
        if self.pending.insert(call.id.clone(), turn_index).is_some() {
            self.record(Diagnostic::DuplicateToolCallId {
                message_index,
                tool_call_id: call.id.clone(),
            });
        }
    }

    fn settle_tool_call(
        &mut self,
        message_index: usize,
        message: &RawMessage,
        tool_call_id: Option<&str>,
    ) {
        let Some(tool_call_id) = tool_call_id else {
            let raw = serde_json::to_string(message).unwrap_or_default();
            self.record(Diagnostic::MissingToolCallId { message_index, raw });
            return;
        };

        let Some(turn_index) = self.pending.remove(tool_call_id) else {
            self.record(Diagnostic::UnmatchedToolCallId {
                message_index,
                tool_call_id: tool_call_id.to_string(),
            });
            return;
        };

        let outcome = parse_tool_result(&message.text());
        if !settle_turn(&mut self.turns, turn_index, tool_call_id, outcome) {
            tracing::warn!(
                message_index,
                tool_call_id,
                turn_index,
                "Pending tool call points at a turn without a tool call, result dropped"
            );
        }
    }

    fn finish(self) -> Transformed {
        let mut pending: Vec<(String, usize)> = self.pending.into_iter().collect();
        pending.sort_by_key(|(_, turn_index)| *turn_index);

        Transformed {
            turns: self.turns,
            diagnostics: self.diagnostics,
            pending_call_ids: pending.into_iter().map(|(id, _)| id).collect(),
        }
    }
}

/// Apply a tool result to the tool call turn at `turn_index`.
///
/// Returns `false` when that turn carries no tool call.
fn settle_turn(
    turns: &mut [DisplayTurn],
    turn_index: usize,
    tool_call_id: &str,
    outcome: ToolOutcome,
) -> bool {
    let Some(tool_call) = turns
        .get_mut(turn_index)
        .and_then(|turn| turn.tool_call.as_mut())
    else {
        return false;
    };

    match &outcome {
        ToolOutcome::Unrecognized { .. } => tracing::debug!(
            tool_call_id,
            tool_name = %tool_call.tool_name,
            "Tool result matched no known marker, keeping raw text"
        ),
        _ if outcome.tool_name() != Some(tool_call.tool_name.as_str()) => tracing::debug!(
            tool_call_id,
            expected = %tool_call.tool_name,
            reported = ?outcome.tool_name(),
            "Tool result names a different tool than the call"
        ),
        _ => {}
    }

    tool_call.apply(outcome);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_success() -> String {
        "Tool \"search\" executed successfully:\n{\"result\":\"data\"}\n(Execution time: 100ms)"
            .to_string()
    }

    #[test]
    fn test_empty_input() {
        let transformer = ConversationTransformer::new();
        assert!(transformer.transform(&[]).is_empty());
    }

    #[test]
    fn test_single_user_message() {
        let turns = ConversationTransformer::new().transform(&[RawMessage::user("Hello")]);
        assert_eq!(turns, vec![DisplayTurn::user("Hello")]);
    }

    #[test]
    fn test_system_messages_dropped() {
        let turns = ConversationTransformer::new().transform(&[
            RawMessage::system("prompt"),
            RawMessage::user("Hi"),
            RawMessage::system("another"),
            RawMessage::assistant("Hello!"),
        ]);
        assert_eq!(
            turns,
            vec![DisplayTurn::user("Hi"), DisplayTurn::assistant("Hello!")]
        );
    }

    #[test]
    fn test_null_content_normalized() {
        let turns = ConversationTransformer::new().transform(&[RawMessage::User { content: None }]);
        assert_eq!(turns, vec![DisplayTurn::user("")]);
    }

    #[test]
    fn test_empty_assistant_emits_nothing() {
        let turns = ConversationTransformer::new().transform(&[
            RawMessage::Assistant {
                content: None,
                tool_calls: None,
            },
            RawMessage::assistant(""),
            RawMessage::assistant_with_tool_calls(Some(""), vec![]),
        ]);
        assert!(turns.is_empty());
    }

    #[test]
    fn test_tool_call_completed() {
        let turns = ConversationTransformer::new().transform(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_123", "search", r#"{"query":"test"}"#)],
            ),
            RawMessage::tool("call_123", search_success()),
        ]);

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, DisplayRole::Assistant);
        assert_eq!(turns[0].content, "");
        let call = turns[0].tool_call.as_ref().unwrap();
        assert_eq!(call.tool_name, "search");
        assert_eq!(call.parameters, json!({"query": "test"}));
        assert_eq!(call.status, ToolCallStatus::Completed);
        assert_eq!(call.result, Some(json!({"result": "data"})));
        assert_eq!(call.execution_time, Some(100));
        assert!(call.error.is_none());
    }

    #[test]
    fn test_content_then_tool_calls() {
        let turns = ConversationTransformer::new().transform(&[
            RawMessage::assistant_with_tool_calls(
                Some("Let me look."),
                vec![
                    ToolCallRequest::function("call_1", "a", "{}"),
                    ToolCallRequest::function("call_2", "b", "{}"),
                ],
            ),
        ]);
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0], DisplayTurn::assistant("Let me look."));
        assert_eq!(turns[1].tool_call.as_ref().unwrap().tool_name, "a");
        assert_eq!(turns[2].tool_call.as_ref().unwrap().tool_name, "b");
    }

    #[test]
    fn test_malformed_arguments() {
        let result = ConversationTransformer::new().transform_with_diagnostics(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_1", "search", "invalid json{")],
            ),
        ]);

        assert_eq!(result.turns.len(), 1);
        let call = result.turns[0].tool_call.as_ref().unwrap();
        assert_eq!(call.parameters, json!({}));
        assert_eq!(call.status, ToolCallStatus::Executing);
        assert_eq!(result.errors().count(), 1);
        assert!(matches!(
            &result.diagnostics[0],
            Diagnostic::MalformedArguments { tool_name, raw_arguments, .. }
                if tool_name == "search" && raw_arguments == "invalid json{"
        ));
    }

    #[test]
    fn test_unmatched_tool_message_dropped() {
        let result = ConversationTransformer::new().transform_with_diagnostics(&[
            RawMessage::user("Hi"),
            RawMessage::tool("call_missing", "whatever"),
        ]);
        assert_eq!(result.turns, vec![DisplayTurn::user("Hi")]);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::UnmatchedToolCallId {
                message_index: 1,
                tool_call_id: "call_missing".to_string(),
            }]
        );
    }

    #[test]
    fn test_tool_message_without_id_dropped() {
        let result = ConversationTransformer::new().transform_with_diagnostics(&[
            RawMessage::Tool {
                tool_call_id: None,
                content: Some(MessageContent::Text("result".to_string())),
            },
        ]);
        assert!(result.turns.is_empty());
        assert_eq!(result.warnings().count(), 1);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::MissingToolCallId { message_index: 0, .. }
        ));
    }

    #[test]
    fn test_second_result_for_same_call_is_unmatched() {
        let result = ConversationTransformer::new().transform_with_diagnostics(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_1", "search", "{}")],
            ),
            RawMessage::tool("call_1", search_success()),
            RawMessage::tool("call_1", format_tool_failure("search", "late")),
        ]);
        let call = result.turns[0].tool_call.as_ref().unwrap();
        assert_eq!(call.status, ToolCallStatus::Completed);
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_pending_call_ids_reported_in_order() {
        let result = ConversationTransformer::new().transform_with_diagnostics(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![
                    ToolCallRequest::function("call_a", "a", "{}"),
                    ToolCallRequest::function("call_b", "b", "{}"),
                    ToolCallRequest::function("call_c", "c", "{}"),
                ],
            ),
            RawMessage::tool("call_b", format_tool_failure("b", "nope")),
        ]);
        assert_eq!(result.pending_call_ids, vec!["call_a", "call_c"]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_pending_id_repoints_join_key() {
        let result = ConversationTransformer::new().transform_with_diagnostics(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_1", "first", "{}")],
            ),
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_1", "second", "{}")],
            ),
            RawMessage::tool("call_1", format_tool_failure("second", "boom")),
        ]);

        assert_eq!(result.turns.len(), 2);
        let first = result.turns[0].tool_call.as_ref().unwrap();
        let second = result.turns[1].tool_call.as_ref().unwrap();
        assert_eq!(first.status, ToolCallStatus::Executing);
        assert_eq!(second.status, ToolCallStatus::Failed);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::DuplicateToolCallId { message_index: 1, .. }
        ));
    }

    #[test]
    fn test_unrecognized_result_completes_with_raw_text() {
        let turns = ConversationTransformer::new().transform(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_1", "ls", "{}")],
            ),
            RawMessage::tool("call_1", "a.txt\nb.txt"),
        ]);
        let call = turns[0].tool_call.as_ref().unwrap();
        assert_eq!(call.status, ToolCallStatus::Completed);
        assert_eq!(call.result, Some(json!("a.txt\nb.txt")));
    }

    #[test]
    fn test_failure_quoting_success_marker_stays_failed() {
        let turns = ConversationTransformer::new().transform(&[
            RawMessage::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::function("call_1", "run", r#"{"cmd":"make"}"#)],
            ),
            RawMessage::tool(
                "call_1",
                "Tool \"run\" failed: subprocess said Tool \"x\" executed successfully: ok",
            ),
        ]);

        let call = turns[0].tool_call.as_ref().unwrap();
        assert_eq!(call.status, ToolCallStatus::Failed);
        assert_eq!(
            call.error.as_deref(),
            Some("subprocess said Tool \"x\" executed successfully: ok")
        );
        assert!(call.result.is_none());
    }

    #[test]
    fn test_settle_turn_reports_turn_without_tool_call() {
        let mut turns = vec![
            DisplayTurn::user("Hi"),
            DisplayTurn::tool_call(ToolCallDisplay::executing("search", json!({}))),
        ];

        let outcome = parse_tool_result(&search_success());
        assert!(!settle_turn(&mut turns, 0, "call_1", outcome.clone()));
        assert!(!settle_turn(&mut turns, 7, "call_1", outcome.clone()));
        assert_eq!(turns[0], DisplayTurn::user("Hi"));

        assert!(settle_turn(&mut turns, 1, "call_1", outcome));
        assert_eq!(
            turns[1].tool_call.as_ref().unwrap().status,
            ToolCallStatus::Completed
        );
    }

    #[test]
    fn test_transform_is_repeatable() {
        let messages = vec![
            RawMessage::user("go"),
            RawMessage::assistant_with_tool_calls(
                Some("ok"),
                vec![ToolCallRequest::function("call_1", "search", r#"{"q":1}"#)],
            ),
            RawMessage::tool("call_1", search_success()),
        ];
        let transformer = ConversationTransformer::new();
        assert_eq!(transformer.transform(&messages), transformer.transform(&messages));
    }
}
