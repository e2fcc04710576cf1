//! Decoding of single Claude Code JSONL transcript lines.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry has no message")]
    MissingMessage,
}

/// One decoded transcript line, resolved by role.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    User(Content),
    Assistant(Content),
    /// Any other role (system, progress, summary, ...).
    Other { role: Option<String> },
}

/// Shape of `message.content`.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Plain string content (free-text user turns).
    Text(String),
    /// Typed content blocks (assistant replies, tool results).
    Blocks(Vec<ContentBlock>),
    /// Missing, null, or not a string/array.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// A `text` block. `None` when the block carried no string `text`.
    Text(Option<String>),
    ToolUse,
    ToolResult,
    Thinking,
    Other(Option<String>),
}

// --- Wire format ---

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    entry_type: Option<String>,
    message: Option<RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    role: Option<String>,
    #[serde(default)]
    content: Value,
}

/// Parse one transcript line.
///
/// The role comes from `message.role`, falling back to the entry `type`.
pub fn parse_line(line: &str) -> Result<LogEntry, EntryError> {
    let raw: RawEntry = serde_json::from_str(line)?;
    let message = raw.message.ok_or(EntryError::MissingMessage)?;

    let role = message.role.or(raw.entry_type);
    let entry = match role.as_deref() {
        Some("user") => LogEntry::User(Content::from_value(message.content)),
        Some("assistant") => LogEntry::Assistant(Content::from_value(message.content)),
        _ => LogEntry::Other { role },
    };
    Ok(entry)
}

impl Content {
    fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Array(items) => {
                Self::Blocks(items.iter().map(ContentBlock::from_value).collect())
            }
            _ => Self::Unrecognized,
        }
    }
}

impl ContentBlock {
    fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str);
        match kind {
            Some("text") => {
                Self::Text(value.get("text").and_then(Value::as_str).map(String::from))
            }
            Some("tool_use") => Self::ToolUse,
            Some("tool_result") => Self::ToolResult,
            Some("thinking" | "redacted_thinking") => Self::Thinking,
            other => Self::Other(other.map(String::from)),
        }
    }
}
