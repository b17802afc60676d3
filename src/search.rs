//! The common contract both search engines implement.

use crate::board::{Board, Color};
use crate::movegen::Move;

/// A move-selection strategy. The two engines ([`crate::alphabeta::AlphaBeta`]
/// and [`crate::mcts::Mcts`]) are interchangeable behind this trait; a
/// decision runs to completion synchronously, clones the position per branch,
/// and keeps no state between calls.
pub trait SearchStrategy {
    /// Pick an action for `color`, or `None` when the side to move has no
    /// legal action at all.
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move>;

    /// Short strategy name for diagnostics.
    fn name(&self) -> &'static str;
}
