//! Static position evaluation.
//!
//! Material only: each revealed piece contributes its kind's fixed value,
//! positive for the perspective color and negative for the opponent. Empty
//! and face-down squares contribute nothing. There is no positional,
//! mobility, or king-safety term.

use crate::board::{Board, Cell, Color, PieceKind};
use crate::constants::{KIND_VALUES, WIN_SCORE};

/// Material value of a piece kind.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    KIND_VALUES[kind.index()]
}

/// Signed material sum from `perspective`'s point of view.
pub fn evaluate(board: &Board, perspective: Color) -> i32 {
    let mut score = 0;
    for cell in &board.cells {
        if let Cell::Piece(piece) = cell {
            if piece.color == perspective {
                score += piece_value(piece.kind);
            } else {
                score -= piece_value(piece.kind);
            }
        }
    }
    score
}

/// Terminal-aware material score used to grade MCTS playouts.
///
/// A lone revealed enemy piece is a won board (we can hunt it down), worth
/// the extreme sentinel; symmetrically it is lost when we are the side
/// reduced to one piece. The single drawn case is King against King.
pub fn playout_score(board: &Board, perspective: Color) -> i32 {
    let mine = board.piece_count(perspective);
    let theirs = board.piece_count(perspective.opponent());

    if theirs == 1 {
        if mine > 1 {
            return WIN_SCORE;
        }
        if mine == 1 {
            let both_kings = board.cells.iter().all(|cell| match cell {
                Cell::Piece(p) => p.kind == PieceKind::King,
                _ => true,
            });
            return if both_kings { 0 } else { -WIN_SCORE };
        }
    }

    evaluate(board, perspective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_square;
    use crate::constants::BOARD_SIZE;

    fn put(board: &mut Board, sq: &str, c: char) {
        board.cells[parse_square(sq).unwrap()] = Cell::from_char(c).unwrap();
    }

    #[test]
    fn test_evaluate_signed_material() {
        let mut board = Board::empty();
        put(&mut board, "a1", 'K'); // +1000
        put(&mut board, "b1", 'P'); // +200
        put(&mut board, "c1", 'r'); // -500
        assert_eq!(evaluate(&board, Color::Red), 700);
        assert_eq!(evaluate(&board, Color::Black), -700);
    }

    #[test]
    fn test_evaluate_ignores_hidden_cells() {
        let board = Board::start();
        assert_eq!(evaluate(&board, Color::Red), 0);
        assert_eq!(board.covered_count(), BOARD_SIZE);
    }

    #[test]
    fn test_playout_score_lone_enemy() {
        let mut board = Board::empty();
        put(&mut board, "a1", 'K');
        put(&mut board, "b1", 'P');
        put(&mut board, "h4", 'g');
        assert_eq!(playout_score(&board, Color::Red), WIN_SCORE);
        // The outnumbered side has two enemies left, so no sentinel applies.
        assert_eq!(playout_score(&board, Color::Black), 700 - 1200);
    }

    #[test]
    fn test_playout_score_king_vs_king_draw() {
        let mut board = Board::empty();
        put(&mut board, "a1", 'K');
        put(&mut board, "h4", 'k');
        assert_eq!(playout_score(&board, Color::Red), 0);
        assert_eq!(playout_score(&board, Color::Black), 0);

        // King against a lone non-king piece is not a draw.
        let mut board = Board::empty();
        put(&mut board, "a1", 'K');
        put(&mut board, "h4", 'c');
        assert_eq!(playout_score(&board, Color::Black), -WIN_SCORE);
    }

    #[test]
    fn test_playout_score_falls_back_to_material() {
        let mut board = Board::empty();
        put(&mut board, "a1", 'K');
        put(&mut board, "b1", 'g');
        put(&mut board, "c1", 'p');
        assert_eq!(playout_score(&board, Color::Red), 1000 - 700 - 200);
    }
}
