//! Constants for board geometry, piece inventory, and search parameters.
//!
//! Banqi is played on a 4x8 board with 32 pieces, all of which start
//! face-down. Squares are indexed column-major: `square = row + column * 4`,
//! with row 0 at the bottom and column 0 on the left ("a1").

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of rows (ranks 1-4).
pub const ROW_COUNT: usize = 4;

/// Number of columns (files a-h).
pub const COL_COUNT: usize = 8;

/// Total number of squares.
pub const BOARD_SIZE: usize = ROW_COUNT * COL_COUNT;

/// The four orthogonal step directions as (row delta, column delta):
/// west, north, east, south.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

// =============================================================================
// Piece Inventory
// =============================================================================

/// Number of piece kinds per color.
pub const KIND_COUNT: usize = 7;

/// Number of distinct piece identities (kind x color).
pub const PIECE_COUNT: usize = 2 * KIND_COUNT;

/// Starting quota of each kind, per color, in hierarchy order
/// (King, Advisor, Minister, Chariot, Horse, Cannon, Soldier).
pub const KIND_QUOTAS: [u8; KIND_COUNT] = [1, 2, 2, 2, 2, 2, 5];

/// Material value of each kind, in hierarchy order.
pub const KIND_VALUES: [i32; KIND_COUNT] = [1000, 700, 600, 500, 400, 300, 200];

/// Board characters for red pieces, in hierarchy order.
pub const RED_CHARS: [char; KIND_COUNT] = ['K', 'G', 'M', 'R', 'N', 'C', 'P'];

/// Board characters for black pieces, in hierarchy order.
pub const BLACK_CHARS: [char; KIND_COUNT] = ['k', 'g', 'm', 'r', 'n', 'c', 'p'];

/// Board character for a face-down piece.
pub const COVER_CHAR: char = 'X';

/// Board character for an empty square.
pub const EMPTY_CHAR: char = '-';

// =============================================================================
// Search Parameters
// =============================================================================

/// Default alpha-beta search depth.
pub const MAX_DEPTH: u32 = 5;

/// Default number of MCTS iterations per decision.
pub const ITERATION_COUNT: usize = 1000;

/// Default playout length in plies for MCTS simulations.
pub const SIMULATION_DEPTH: usize = 10;

/// UCB1 exploration constant.
pub const UCB_C: f64 = 1.414;

/// Score sentinel for a won playout (lone enemy piece, ours to take).
pub const WIN_SCORE: i32 = 1_000_000;
