//! Banqi-Rust: a search engine for 4x8 Chinese dark chess.
//!
//! The engine decides moves for banqi, a partial-information capture game:
//! all 32 pieces start face-down, a reveal turns one face-up, and a capture
//! hierarchy governs which kind may take which. Two interchangeable search
//! strategies are provided behind one contract.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, piece inventory, search parameters
//! - [`board`] - Position representation, capture rules, move execution
//! - [`movegen`] - Legal action enumeration (reveals, moves, cannon captures)
//! - [`reveal`] - Resolution of hidden pieces revealed during search
//! - [`eval`] - Static material evaluation
//! - [`search`] - The strategy contract both engines implement
//! - [`alphabeta`] - Bounded minimax with alpha-beta pruning
//! - [`mcts`] - Monte Carlo Tree Search
//! - [`playout`] - Random game simulation for MCTS
//! - [`protocol`] - Line-oriented driver session for a referee process
//!
//! ## Example
//!
//! ```
//! use banqi_rust::board::{Board, Color};
//! use banqi_rust::mcts::Mcts;
//!
//! // Start of game: everything is face-down.
//! let board = Board::start();
//!
//! let mut engine = Mcts::with_seed(1);
//! engine.iterations = 200;
//! let mv = engine.choose_move(&board, Color::Red).expect("start position has moves");
//!
//! // The only legal opening action is to reveal a piece.
//! assert!(mv.is_reveal());
//! ```

pub mod alphabeta;
pub mod board;
pub mod constants;
pub mod eval;
pub mod mcts;
pub mod movegen;
pub mod playout;
pub mod protocol;
pub mod reveal;
pub mod search;
