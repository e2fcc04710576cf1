//! Recent-conversation context: the last few turns of a transcript rendered
//! as one block of text.

use std::path::Path;

use serde_json::json;

use crate::config::Config;
use crate::debug_log::DebugLog;
use crate::dispatch::Payload;
use crate::transcript::{self, Turn};

/// A formatted window of recent turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentContext {
    pub turns: Vec<Turn>,
    pub text: String,
}

impl RecentContext {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn into_payload(self, session_id: Option<String>, cwd: Option<String>) -> Payload {
        Payload::new(self.text).with_session(session_id, cwd)
    }
}

/// Turns to keep: the explicit request, else the configured window.
pub fn window_size(requested: Option<usize>, config: &Config) -> usize {
    requested.unwrap_or(config.window_turns)
}

/// Build the context for the last `n` turns of the transcript at `path`.
///
/// An unreadable transcript yields an empty context.
pub fn recent_context(path: &Path, n: usize, config: &Config, log: &dyn DebugLog) -> RecentContext {
    let contents = transcript::read_transcript(path).unwrap_or_default();
    let turns = transcript::recent_turns(&contents, n);
    let text = transcript::format_context(&turns, config.max_turn_chars);

    let roles: Vec<&str> = turns.iter().map(|turn| turn.role.as_str()).collect();
    log.record(
        "recent_context",
        json!({
            "path": path.display().to_string(),
            "requested": n,
            "turns": turns.len(),
            "roles": roles,
            "chars": text.chars().count(),
        }),
    );
    RecentContext { turns, text }
}
