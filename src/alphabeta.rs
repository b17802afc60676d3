//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Every node clones the board (which carries the face-down inventory) before
//! applying a move, so sibling branches never observe each other's
//! mutations. Reveals are resolved through the engine's [`RevealPolicy`];
//! with the default single-sample policy each reveal becomes one child, with
//! [`ExpectedReveal`](crate::reveal::ExpectedReveal) it becomes an
//! inventory-weighted average over every identity still face-down.
//!
//! Leaves are always scored from the color that owns the decision, not the
//! color to move at the leaf. That keeps every score in the tree directly
//! comparable, and the alpha/beta bounds consistent, without negamax sign
//! flips. Changing this to per-node perspective would change search behavior.

use crate::board::{Board, Color};
use crate::constants::MAX_DEPTH;
use crate::eval::evaluate;
use crate::movegen::{Move, generate_moves};
use crate::reveal::{RevealPolicy, SampledReveal};
use crate::search::SearchStrategy;

/// Minimax engine with a bounded depth.
pub struct AlphaBeta<P = SampledReveal> {
    /// Search depth in plies.
    pub max_depth: u32,
    policy: P,
}

impl Default for AlphaBeta<SampledReveal> {
    fn default() -> Self {
        Self::new()
    }
}

impl AlphaBeta<SampledReveal> {
    pub fn new() -> AlphaBeta<SampledReveal> {
        AlphaBeta {
            max_depth: MAX_DEPTH,
            policy: SampledReveal::new(),
        }
    }
}

impl<P: RevealPolicy> AlphaBeta<P> {
    /// Engine with an explicit depth and reveal policy.
    pub fn with_policy(max_depth: u32, policy: P) -> AlphaBeta<P> {
        AlphaBeta { max_depth, policy }
    }

    /// Pick the root move with the strictly greatest score; ties keep the
    /// first-seen move. Each root move is searched with a fresh full window.
    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let mut best_score = i32::MIN;
        let mut best_move = None;

        for mv in generate_moves(board, color) {
            let depth = self.max_depth.saturating_sub(1);
            let Some(score) =
                self.move_value(board, mv, depth, i32::MIN, i32::MAX, color, color)
            else {
                continue; // infeasible reveal
            };
            if score > best_score || best_move.is_none() {
                best_score = score;
                best_move = Some(mv);
            }
        }

        best_move
    }

    /// Minimax value of `board` with `to_move` to play and `depth` plies
    /// left, scored from `root`'s perspective.
    pub fn search(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        to_move: Color,
        root: Color,
    ) -> i32 {
        if depth == 0 {
            return evaluate(board, root);
        }
        let moves = generate_moves(board, to_move);
        if moves.is_empty() {
            return evaluate(board, root);
        }

        if to_move == root {
            let mut best = i32::MIN;
            for mv in moves {
                let Some(score) =
                    self.move_value(board, mv, depth - 1, alpha, beta, to_move, root)
                else {
                    continue;
                };
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mv in moves {
                let Some(score) =
                    self.move_value(board, mv, depth - 1, alpha, beta, to_move, root)
                else {
                    continue;
                };
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Apply one move on a clone and search the child. `None` means the move
    /// was a reveal with nothing left face-down and the branch is skipped.
    fn move_value(
        &mut self,
        board: &Board,
        mv: Move,
        depth: u32,
        alpha: i32,
        beta: i32,
        to_move: Color,
        root: Color,
    ) -> Option<i32> {
        let next = to_move.opponent();

        if mv.is_reveal() {
            let outcomes = self.policy.outcomes(&board.cover);
            if outcomes.is_empty() {
                return None;
            }
            if outcomes.len() == 1 {
                let (piece, _) = outcomes[0];
                let mut child = board.clone();
                child.apply_reveal(mv.to, piece);
                return Some(self.search(&child, depth, alpha, beta, next, root));
            }
            // Chance node: average the outcomes. Children get a full window,
            // a cut bound from one outcome is not valid for its siblings.
            let mut expected = 0.0;
            for (piece, weight) in outcomes {
                let mut child = board.clone();
                child.apply_reveal(mv.to, piece);
                let score = self.search(&child, depth, i32::MIN, i32::MAX, next, root);
                expected += weight * score as f64;
            }
            Some(expected.round() as i32)
        } else {
            let mut child = board.clone();
            child.apply_move(mv);
            Some(self.search(&child, depth, alpha, beta, next, root))
        }
    }
}

impl<P: RevealPolicy> SearchStrategy for AlphaBeta<P> {
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        AlphaBeta::choose_move(self, board, color)
    }

    fn name(&self) -> &'static str {
        "alphabeta"
    }
}
