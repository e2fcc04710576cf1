//! Claude Code JSONL transcript extraction.
//!
//! Pipeline: lines → [`entry::parse_line`] → [`turn::classify`] →
//! [`turn::select`] / [`window::select_window`] → [`format::format_context`].

pub mod entry;
pub mod format;
pub mod turn;
pub mod window;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

pub use entry::{parse_line, Content, ContentBlock, EntryError, LogEntry};
pub use format::format_context;
pub use turn::{classify, select, Role, Selection, Turn};
pub use window::select_window;

/// Classified turns of a transcript, in file order.
///
/// Blank lines are skipped before parsing; lines that fail to parse or
/// classify contribute nothing.
pub fn turns(contents: &str) -> impl Iterator<Item = Turn> + '_ {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match parse_line(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping transcript line {}: {e}", index + 1);
                None
            }
        })
        .filter_map(|entry| classify(&entry))
}

/// Turns selected from a transcript by `selection`.
pub fn extract(contents: &str, selection: Selection) -> Vec<Turn> {
    select(turns(contents), selection)
}

/// The most recent assistant turn, untruncated.
pub fn last_assistant_turn(contents: &str) -> Option<Turn> {
    extract(contents, Selection::Latest(Role::Assistant)).pop()
}

/// The last `n` turns of both roles.
pub fn recent_turns(contents: &str, n: usize) -> Vec<Turn> {
    select_window(extract(contents, Selection::Accumulate), n)
}

/// Read a whole transcript file. A missing or unreadable file is `None`.
pub fn read_transcript(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            warn!("Failed to read transcript {}: {e}", path.display());
            None
        }
    }
}
