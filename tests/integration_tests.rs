//! Integration tests for the board model and move generator.
//!
//! These exercise the game-level properties the search engines depend on:
//! the piece-quota invariant, the capture hierarchy, and cannon screen
//! captures.

use banqi_rust::board::{
    ALL_KINDS, Board, Cell, Color, Piece, PieceKind, can_capture, parse_square,
};
use banqi_rust::constants::{BOARD_SIZE, PIECE_COUNT};
use banqi_rust::movegen::{Move, generate_moves};

// =============================================================================
// Helpers
// =============================================================================

fn put(board: &mut Board, sq: &str, c: char) {
    board.cells[parse_square(sq).unwrap()] = Cell::from_char(c).unwrap();
}

fn mv(from: &str, to: &str) -> Move {
    Move::new(parse_square(from).unwrap(), parse_square(to).unwrap())
}

/// Assert the quota invariant: for every piece identity, face-down count
/// plus face-up count never exceeds the quota (the remainder is captured),
/// and the inventory total matches the number of face-down squares.
fn assert_quota_invariant(board: &Board) {
    assert_eq!(board.cover.total as usize, board.covered_count());
    for i in 0..PIECE_COUNT {
        let piece = Piece::from_index(i);
        let face_up = board
            .cells
            .iter()
            .filter(|c| **c == Cell::Piece(piece))
            .count();
        let face_down = board.cover.get(piece) as usize;
        let quota = piece.kind.quota() as usize;
        assert!(
            face_down + face_up <= quota,
            "{piece:?}: {face_down} face-down + {face_up} face-up > quota {quota}"
        );
    }
}

// =============================================================================
// Quota invariant
// =============================================================================

#[test]
fn test_quota_invariant_through_a_game_prefix() {
    let mut board = Board::start();
    assert_quota_invariant(&board);

    // Reveal a few pieces the way a referee would report them.
    let reveals = [
        ("a1", 'K'),
        ("a2", 'p'),
        ("b1", 'P'),
        ("b2", 'c'),
        ("c1", 'r'),
    ];
    for (sq, c) in reveals {
        board.apply_reveal(parse_square(sq).unwrap(), Piece::from_char(c).unwrap());
        assert_quota_invariant(&board);
    }

    // A capture: the black chariot takes the red soldier next to it.
    board.apply_move(mv("c1", "b1"));
    assert_quota_invariant(&board);

    // The red king takes the black soldier above it.
    board.apply_move(mv("a1", "a2"));
    assert_quota_invariant(&board);
}

#[test]
fn test_start_inventory_accounts_for_all_pieces() {
    let board = Board::start();
    let total: usize = (0..PIECE_COUNT)
        .map(|i| board.cover.get(Piece::from_index(i)) as usize)
        .sum();
    assert_eq!(total, BOARD_SIZE);
}

// =============================================================================
// Capture hierarchy
// =============================================================================

#[test]
fn test_hierarchy_is_strict_except_soldier_king() {
    for (i, &attacker) in ALL_KINDS.iter().enumerate() {
        for (j, &defender) in ALL_KINDS.iter().enumerate() {
            let a = Piece::new(Color::Red, attacker);
            let d = Cell::Piece(Piece::new(Color::Black, defender));
            let exception =
                attacker == PieceKind::Soldier && defender == PieceKind::King;
            // Lower index = higher in the hierarchy.
            let expected = exception || i <= j;
            assert_eq!(
                can_capture(a, d),
                expected,
                "{attacker:?} vs {defender:?}"
            );
        }
    }
}

// =============================================================================
// Cannon screen captures
// =============================================================================

#[test]
fn test_cannon_screen_patterns() {
    let from = parse_square("a2").unwrap();

    // [cannon, empty, enemy]: zero screens, no capture.
    let mut board = Board::empty();
    put(&mut board, "a2", 'C');
    put(&mut board, "c2", 'r');
    let moves = generate_moves(&board, Color::Red);
    assert!(!moves.contains(&mv("a2", "c2")));

    // [cannon, screen, enemy]: exactly one capture onto the enemy square.
    put(&mut board, "b2", 'G');
    let captures: Vec<Move> = generate_moves(&board, Color::Red)
        .into_iter()
        .filter(|m| m.from == from && !m.is_reveal() && board.cells[m.to] != Cell::Empty)
        .collect();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].to, parse_square("c2").unwrap());

    // [cannon, screen, screen, enemy]: two screens, no capture.
    let mut board = Board::empty();
    put(&mut board, "a2", 'C');
    put(&mut board, "b2", 'G');
    put(&mut board, "c2", 'g');
    put(&mut board, "d2", 'r');
    assert!(!generate_moves(&board, Color::Red).contains(&mv("a2", "d2")));
    // The piece beyond the first target is never considered.
    assert!(generate_moves(&board, Color::Red).contains(&mv("a2", "c2")));
}

#[test]
fn test_cannon_screens_work_on_columns_too() {
    let mut board = Board::empty();
    put(&mut board, "d1", 'c');
    put(&mut board, "d2", 'X');
    put(&mut board, "d3", 'R');
    assert!(generate_moves(&board, Color::Black).contains(&mv("d1", "d3")));
}

// =============================================================================
// Move generation basics
// =============================================================================

#[test]
fn test_start_position_is_all_reveals() {
    let board = Board::start();
    for color in [Color::Red, Color::Black] {
        let moves = generate_moves(&board, color);
        assert_eq!(moves.len(), 32);
        assert!(moves.iter().all(|m| m.is_reveal()));
    }
}

#[test]
fn test_generation_is_deterministic() {
    let mut board = Board::start();
    board.apply_reveal(parse_square("c2").unwrap(), Piece::from_char('R').unwrap());
    board.apply_reveal(parse_square("c3").unwrap(), Piece::from_char('n').unwrap());

    let first = generate_moves(&board, Color::Red);
    for _ in 0..5 {
        assert_eq!(generate_moves(&board, Color::Red), first);
    }
}

#[test]
fn test_move_display() {
    assert_eq!(mv("a1", "b1").to_string(), "a1b1");
    assert_eq!(Move::reveal(parse_square("h4").unwrap()).to_string(), "h4h4");
}
