//! Turn classification: which entries are real user/assistant utterances.

use super::entry::{Content, ContentBlock, LogEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Display label used by the context formatter.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// A meaningful utterance. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// How classified turns are collected across a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every qualifying turn, in arrival order.
    Accumulate,
    /// Only the most recent qualifying turn of one role.
    Latest(Role),
}

/// Classify one entry, returning `None` for anything that is not a genuine
/// utterance (tool results, tool-only or thinking-only replies, other roles).
pub fn classify(entry: &LogEntry) -> Option<Turn> {
    match entry {
        LogEntry::User(content) => classify_user(content),
        LogEntry::Assistant(content) => classify_assistant(content),
        LogEntry::Other { .. } => None,
    }
}

fn classify_user(content: &Content) -> Option<Turn> {
    // Block-shaped user content is a tool result, not something the user said.
    let Content::Text(text) = content else {
        return None;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Turn {
        role: Role::User,
        text: trimmed.to_string(),
    })
}

fn classify_assistant(content: &Content) -> Option<Turn> {
    let Content::Blocks(blocks) = content else {
        return None;
    };
    let texts: Vec<&str> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text(Some(text)) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    if texts.is_empty() {
        return None;
    }

    let text = texts.join("\n");
    if text.trim().is_empty() {
        return None;
    }
    Some(Turn {
        role: Role::Assistant,
        text,
    })
}

/// Apply a selection policy to a stream of turns.
pub fn select<I>(turns: I, selection: Selection) -> Vec<Turn>
where
    I: IntoIterator<Item = Turn>,
{
    match selection {
        Selection::Accumulate => turns.into_iter().collect(),
        Selection::Latest(role) => turns
            .into_iter()
            .filter(|turn| turn.role == role)
            .last()
            .into_iter()
            .collect(),
    }
}
