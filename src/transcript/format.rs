//! Renders a window of turns as a readable context block.

use super::turn::Turn;

pub const ELLIPSIS: &str = "...";
pub const SEPARATOR: &str = "\n\n---\n\n";

/// Format turns as `Label: text` sections separated by `---`.
///
/// Each turn's text is cut to `max_chars` characters with [`ELLIPSIS`]
/// appended when it was longer.
pub fn format_context(turns: &[Turn], max_chars: usize) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), truncate(&turn.text, max_chars)))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
