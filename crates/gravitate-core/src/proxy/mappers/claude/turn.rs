//! Current-turn boundary detection.
//!
//! A turn starts at the most recent `user` message that carries no
//! `tool_result` block. Tool-result messages continue the running turn even
//! when the client echoes the original task text next to the results.

use super::models::{Message, MessageContent};

/// Index of the message that opens the current turn, or 0 when none qualifies.
pub fn find_turn_start(messages: &[Message]) -> usize {
    messages
        .iter()
        .enumerate()
        .rev()
        .find(|(_, msg)| is_turn_boundary(msg))
        .map_or(0, |(idx, _)| idx)
}

pub fn is_turn_boundary(msg: &Message) -> bool {
    if msg.role != "user" {
        return false;
    }
    match &msg.content {
        MessageContent::String(_) => true,
        MessageContent::Array(blocks) => !blocks.iter().any(|b| b.is_tool_result()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::mappers::claude::models::ContentBlock;
    use serde_json::json;

    fn text(role: &str, t: &str) -> Message {
        Message {
            role: role.to_string(),
            content: MessageContent::Array(vec![ContentBlock::Text { text: t.to_string() }]),
        }
    }

    fn tool_use(id: &str) -> Message {
        Message {
            role: "assistant".to_string(),
            content: MessageContent::Array(vec![ContentBlock::ToolUse {
                id: id.to_string(),
                name: "Read".to_string(),
                input: json!({}),
            }]),
        }
    }

    fn tool_result_with_echo(id: &str, echo: &str) -> Message {
        Message {
            role: "user".to_string(),
            content: MessageContent::Array(vec![
                ContentBlock::ToolResult {
                    tool_use_id: id.to_string(),
                    content: json!("ok"),
                    is_error: None,
                },
                ContentBlock::Text { text: echo.to_string() },
            ]),
        }
    }

    #[test]
    fn test_empty_history_starts_at_zero() {
        assert_eq!(find_turn_start(&[]), 0);
    }

    #[test]
    fn test_echoed_task_after_tool_result_is_not_a_boundary() {
        let messages = vec![
            text("user", "Do A"),
            tool_use("toolu_prev"),
            tool_result_with_echo("toolu_prev", "Do A"),
            text("assistant", "done"),
            text("user", "Do B"),
            tool_use("toolu_curr"),
        ];
        assert_eq!(find_turn_start(&messages), 4);
        assert!(!is_turn_boundary(&messages[2]));
    }

    #[test]
    fn test_tool_result_tail_keeps_previous_boundary() {
        let messages = vec![
            text("user", "Do A"),
            tool_use("toolu_1"),
            tool_result_with_echo("toolu_1", "Do A"),
        ];
        assert_eq!(find_turn_start(&messages), 0);
    }

    #[test]
    fn test_string_content_is_a_boundary() {
        let messages = vec![
            text("user", "first"),
            text("assistant", "reply"),
            Message { role: "user".to_string(), content: MessageContent::String("again".into()) },
        ];
        assert_eq!(find_turn_start(&messages), 2);
    }

    #[test]
    fn test_idempotent() {
        let messages = vec![text("user", "a"), tool_use("t"), tool_result_with_echo("t", "a")];
        assert_eq!(find_turn_start(&messages), find_turn_start(&messages));
    }
}
