//! Legal move enumeration.
//!
//! A move is a (from, to) pair of squares; a reveal of a face-down piece is
//! encoded as a move onto its own square. Generation scans the board in
//! square order so the output is deterministic for a given position, which
//! the tests rely on for reproducibility.

use std::fmt;

use crate::board::{Board, Cell, Color, PieceKind, Square, can_capture, col_of, row_of, square, str_square};
use crate::constants::{BOARD_SIZE, COL_COUNT, DIRECTIONS, ROW_COUNT};

/// A single action: an ordinary move/capture, or a reveal when `from == to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }

    /// The reveal action for a face-down square.
    pub fn reveal(sq: Square) -> Move {
        Move { from: sq, to: sq }
    }

    #[inline]
    pub fn is_reveal(self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", str_square(self.from), str_square(self.to))
    }
}

/// Step one square from (row, col) in a direction, staying on the board.
#[inline]
fn step(row: usize, col: usize, dir: (isize, isize)) -> Option<(usize, usize)> {
    let r = row as isize + dir.0;
    let c = col as isize + dir.1;
    if r < 0 || r >= ROW_COUNT as isize || c < 0 || c >= COL_COUNT as isize {
        None
    } else {
        Some((r as usize, c as usize))
    }
}

/// Enumerate every legal action for `color`.
///
/// Face-down squares yield one reveal each (their identity is irrelevant to
/// legality). Revealed pieces of `color` yield orthogonal moves onto empty
/// or hierarchy-capturable squares; Cannons additionally yield screen
/// captures: on each of the four rays, the second non-empty cell is the only
/// candidate target, taken iff it is a revealed enemy piece.
pub fn generate_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();

    for sq in 0..BOARD_SIZE {
        match board.cells[sq] {
            Cell::Empty => {}
            Cell::Covered => moves.push(Move::reveal(sq)),
            Cell::Piece(piece) if piece.color == color => {
                let (row, col) = (row_of(sq), col_of(sq));

                if piece.kind == PieceKind::Cannon {
                    for dir in DIRECTIONS {
                        let mut pos = (row, col);
                        let mut seen = 0;
                        while let Some(next) = step(pos.0, pos.1, dir) {
                            pos = next;
                            let target = square(pos.0, pos.1);
                            if board.cells[target] == Cell::Empty {
                                continue;
                            }
                            seen += 1;
                            if seen == 2 {
                                // Exactly one screen between us and the target.
                                if let Cell::Piece(victim) = board.cells[target] {
                                    if victim.color != color {
                                        moves.push(Move::new(sq, target));
                                    }
                                }
                                break;
                            }
                        }
                    }
                }

                for dir in DIRECTIONS {
                    if let Some((r, c)) = step(row, col, dir) {
                        let to = square(r, c);
                        if can_capture(piece, board.cells[to]) {
                            moves.push(Move::new(sq, to));
                        }
                    }
                }
            }
            Cell::Piece(_) => {}
        }
    }

    moves
}

/// Immediate-win shortcut: if exactly one revealed enemy piece remains,
/// return a legal move that captures it directly.
pub fn find_winning_capture(board: &Board, color: Color) -> Option<Move> {
    if board.piece_count(color.opponent()) != 1 {
        return None;
    }
    generate_moves(board, color).into_iter().find(|mv| {
        matches!(board.cells[mv.to], Cell::Piece(p) if p.color != color)
    })
}
