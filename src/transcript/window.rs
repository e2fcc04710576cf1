//! Bounded window of the most recent turns.

use super::turn::Turn;

/// Keep the last `n` turns, oldest first. Fewer than `n` turns are returned
/// unchanged; `n == 0` yields an empty window.
pub fn select_window(turns: Vec<Turn>, n: usize) -> Vec<Turn> {
    let skip = turns.len().saturating_sub(n);
    turns.into_iter().skip(skip).collect()
}
