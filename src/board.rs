//! Board representation and move execution for banqi.
//!
//! This module provides the core game model:
//! - Piece identities (`Color`, `PieceKind`, `Piece`) and the capture hierarchy
//! - Cell states (`Cell`): empty, face-down, or a revealed piece
//! - The face-down inventory (`CoverCounts`) tracked alongside the board
//! - Move and reveal execution on a `Board`
//! - Square coordinate parsing and board rendering
//!
//! Squares are indexed `row + column * 4` with row 0 at the bottom, so "a1"
//! is square 0, "a4" is square 3 and "h4" is square 31.

use std::fmt;

use anyhow::{Result, bail, ensure};

use crate::constants::*;
use crate::movegen::Move;

/// A square index in `0..BOARD_SIZE`.
pub type Square = usize;

/// Side to move / piece ownership.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Index for per-color arrays (clocks etc.).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }
}

/// Piece kind, in descending capture-hierarchy order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PieceKind {
    King,
    Advisor,
    Minister,
    Chariot,
    Horse,
    Cannon,
    Soldier,
}

/// All kinds in hierarchy order, aligned with the constant tables.
pub const ALL_KINDS: [PieceKind; KIND_COUNT] = [
    PieceKind::King,
    PieceKind::Advisor,
    PieceKind::Minister,
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Cannon,
    PieceKind::Soldier,
];

impl PieceKind {
    /// Position in the hierarchy tables (King = 0 .. Soldier = 6).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Capture strength: higher captures lower (King = 7 .. Soldier = 1).
    #[inline]
    pub fn strength(self) -> u8 {
        (KIND_COUNT - self.index()) as u8
    }

    /// Starting quota per color.
    #[inline]
    pub fn quota(self) -> u8 {
        KIND_QUOTAS[self.index()]
    }
}

/// A revealed piece identity: one of the fourteen (color, kind) pairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    /// Index into the 14-entry inventory: kinds in hierarchy order,
    /// red before black within each kind.
    #[inline]
    pub fn index(self) -> usize {
        self.kind.index() * 2 + self.color.index()
    }

    /// Inverse of [`Piece::index`].
    pub fn from_index(i: usize) -> Piece {
        debug_assert!(i < PIECE_COUNT);
        let kind = ALL_KINDS[i / 2];
        let color = if i % 2 == 0 { Color::Red } else { Color::Black };
        Piece { color, kind }
    }

    /// Board character: uppercase for red, lowercase for black.
    pub fn to_char(self) -> char {
        match self.color {
            Color::Red => RED_CHARS[self.kind.index()],
            Color::Black => BLACK_CHARS[self.kind.index()],
        }
    }

    /// Parse a board character; `None` for anything outside the alphabet.
    pub fn from_char(c: char) -> Option<Piece> {
        for (i, &kind) in ALL_KINDS.iter().enumerate() {
            if c == RED_CHARS[i] {
                return Some(Piece::new(Color::Red, kind));
            }
            if c == BLACK_CHARS[i] {
                return Some(Piece::new(Color::Black, kind));
            }
        }
        None
    }
}

/// State of one board square.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// No piece.
    Empty,
    /// A face-down piece of unknown identity.
    Covered,
    /// A revealed piece.
    Piece(Piece),
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => EMPTY_CHAR,
            Cell::Covered => COVER_CHAR,
            Cell::Piece(p) => p.to_char(),
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            EMPTY_CHAR => Some(Cell::Empty),
            COVER_CHAR => Some(Cell::Covered),
            _ => Piece::from_char(c).map(Cell::Piece),
        }
    }
}

/// Can `attacker` take a piece standing on `target`?
///
/// Empty squares may always be entered and face-down pieces are never
/// capturable. Between revealed pieces the strict hierarchy decides, with
/// one exception: a Soldier may take the King.
pub fn can_capture(attacker: Piece, target: Cell) -> bool {
    match target {
        Cell::Empty => true,
        Cell::Covered => false,
        Cell::Piece(defender) => {
            if defender.color == attacker.color {
                return false;
            }
            if attacker.kind == PieceKind::Soldier && defender.kind == PieceKind::King {
                return true;
            }
            attacker.kind.strength() >= defender.kind.strength()
        }
    }
}

/// Remaining face-down inventory: one count per piece identity plus a total.
///
/// Counts only ever decrease, by reveals. Together with the board cells this
/// maintains the quota invariant: face-down + face-up + captured = quota.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverCounts {
    pub counts: [u8; PIECE_COUNT],
    pub total: u8,
}

impl CoverCounts {
    /// Full starting inventory: every piece face-down.
    pub fn full() -> CoverCounts {
        let mut counts = [0u8; PIECE_COUNT];
        for i in 0..PIECE_COUNT {
            counts[i] = KIND_QUOTAS[i / 2];
        }
        CoverCounts {
            counts,
            total: BOARD_SIZE as u8,
        }
    }

    /// Empty inventory: nothing left face-down.
    pub fn empty() -> CoverCounts {
        CoverCounts {
            counts: [0; PIECE_COUNT],
            total: 0,
        }
    }

    /// Build an inventory from explicit per-identity counts. The total may
    /// not exceed the number of board squares.
    pub fn from_counts(counts: [u8; PIECE_COUNT]) -> CoverCounts {
        let total = counts.iter().map(|&c| c as u16).sum::<u16>();
        debug_assert!(total <= BOARD_SIZE as u16, "inventory total {total} exceeds board");
        CoverCounts {
            counts,
            total: total as u8,
        }
    }

    #[inline]
    pub fn get(&self, piece: Piece) -> u8 {
        self.counts[piece.index()]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Remove one face-down copy of `piece` after a reveal.
    pub fn take(&mut self, piece: Piece) {
        let i = piece.index();
        self.counts[i] = self.counts[i].saturating_sub(1);
        self.total = self.total.saturating_sub(1);
    }
}

/// A banqi position: 32 cells plus the face-down inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub cells: [Cell; BOARD_SIZE],
    pub cover: CoverCounts,
}

impl Default for Board {
    fn default() -> Self {
        Board::start()
    }
}

impl Board {
    /// Start-of-game position: every square face-down, full inventory.
    pub fn start() -> Board {
        Board {
            cells: [Cell::Covered; BOARD_SIZE],
            cover: CoverCounts::full(),
        }
    }

    /// An empty board with an empty inventory. Used to build positions
    /// piece by piece.
    pub fn empty() -> Board {
        Board {
            cells: [Cell::Empty; BOARD_SIZE],
            cover: CoverCounts::empty(),
        }
    }

    /// Resume from an external position description.
    ///
    /// `cells` holds 32 board characters listed row by row from the top row
    /// (rank 4) down, left to right; `counts` gives the remaining face-down
    /// count for each of the fourteen piece identities in inventory order.
    pub fn from_description(cells: &[char], counts: &[u8]) -> Result<Board> {
        ensure!(
            cells.len() == BOARD_SIZE,
            "expected {} cells, got {}",
            BOARD_SIZE,
            cells.len()
        );
        ensure!(
            counts.len() == PIECE_COUNT,
            "expected {} cover counts, got {}",
            PIECE_COUNT,
            counts.len()
        );
        let sum: u16 = counts.iter().map(|&c| c as u16).sum();
        ensure!(
            sum <= BOARD_SIZE as u16,
            "cover counts sum to {sum}, more than {BOARD_SIZE} squares"
        );

        let mut board = Board::empty();
        let mut i = 0;
        for row in (0..ROW_COUNT).rev() {
            for col in 0..COL_COUNT {
                let c = cells[i];
                let Some(cell) = Cell::from_char(c) else {
                    bail!("invalid cell character {c:?}");
                };
                board.cells[square(row, col)] = cell;
                i += 1;
            }
        }

        let mut inventory = [0u8; PIECE_COUNT];
        inventory.copy_from_slice(counts);
        board.cover = CoverCounts::from_counts(inventory);
        Ok(board)
    }

    /// Relocate a piece, capturing whatever stood on the destination.
    ///
    /// Reveal moves (`from == to`) leave the board unchanged; they are
    /// resolved by [`Board::apply_reveal`] once the identity is known.
    pub fn apply_move(&mut self, mv: Move) {
        if mv.is_reveal() {
            return;
        }
        self.cells[mv.to] = self.cells[mv.from];
        self.cells[mv.from] = Cell::Empty;
    }

    /// Turn a face-down square into a revealed piece and decrement its
    /// inventory count.
    pub fn apply_reveal(&mut self, sq: Square, piece: Piece) {
        self.cells[sq] = Cell::Piece(piece);
        self.cover.take(piece);
    }

    /// Number of revealed pieces belonging to `color`.
    pub fn piece_count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Piece(p) if p.color == color))
            .count()
    }

    /// Number of face-down squares on the board.
    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|c| matches!(c, Cell::Covered)).count()
    }
}

/// Compose a square index from row and column.
#[inline]
pub fn square(row: usize, col: usize) -> Square {
    row + col * ROW_COUNT
}

/// Row of a square (0 = bottom).
#[inline]
pub fn row_of(sq: Square) -> usize {
    sq % ROW_COUNT
}

/// Column of a square (0 = 'a').
#[inline]
pub fn col_of(sq: Square) -> usize {
    sq / ROW_COUNT
}

/// Parse a coordinate string (e.g. "a1", "h4") into a square index.
pub fn parse_square(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a') as usize;
    let row = bytes[1].wrapping_sub(b'1') as usize;
    if col >= COL_COUNT || row >= ROW_COUNT {
        return None;
    }
    Some(square(row, col))
}

/// Convert a square index to its coordinate string (e.g. "a1").
pub fn str_square(sq: Square) -> String {
    let col = (b'a' + col_of(sq) as u8) as char;
    let row = (b'1' + row_of(sq) as u8) as char;
    format!("{col}{row}")
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROW_COUNT).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..COL_COUNT {
                write!(f, "{} ", self.cells[square(row, col)].to_char())?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}
