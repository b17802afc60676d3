//! Uniform-random playouts for MCTS position evaluation.
//!
//! A playout plays random legal actions for a bounded number of plies and
//! grades the resulting board with the terminal-aware material score. Reveals
//! inside a playout are resolved through the same policy the tree uses, so
//! the sampled identities stay consistent with the remaining inventory.

use crate::board::{Board, Color};
use crate::eval::playout_score;
use crate::movegen::generate_moves;
use crate::reveal::RevealPolicy;

/// Play up to `depth` random plies from `board` with `to_move` starting,
/// then score the board from `perspective`.
///
/// Stops early when a side has no legal action left.
pub fn playout<P: RevealPolicy>(
    mut board: Board,
    mut to_move: Color,
    depth: usize,
    perspective: Color,
    policy: &mut P,
    rng: &mut fastrand::Rng,
) -> i32 {
    for _ in 0..depth {
        let moves = generate_moves(&board, to_move);
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.usize(..moves.len())];
        if mv.is_reveal() {
            match policy.sample(&board.cover) {
                Some(piece) => board.apply_reveal(mv.to, piece),
                None => break,
            }
        } else {
            board.apply_move(mv);
        }
        to_move = to_move.opponent();
    }

    playout_score(&board, perspective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, parse_square};
    use crate::constants::WIN_SCORE;
    use crate::reveal::SampledReveal;

    #[test]
    fn test_playout_terminates_and_scores() {
        let board = Board::start();
        let mut policy = SampledReveal::with_seed(1);
        let mut rng = fastrand::Rng::with_seed(2);
        let score = playout(board, Color::Red, 10, Color::Red, &mut policy, &mut rng);
        assert!(score.abs() <= WIN_SCORE);
    }

    #[test]
    fn test_playout_depth_zero_is_static() {
        let mut board = Board::empty();
        board.cells[parse_square("a1").unwrap()] = Cell::from_char('K').unwrap();
        board.cells[parse_square("b1").unwrap()] = Cell::from_char('r').unwrap();
        board.cells[parse_square("h4").unwrap()] = Cell::from_char('p').unwrap();
        let mut policy = SampledReveal::with_seed(1);
        let mut rng = fastrand::Rng::with_seed(2);
        let score = playout(board, Color::Red, 0, Color::Red, &mut policy, &mut rng);
        assert_eq!(score, 1000 - 500 - 200);
    }
}
