//! Banqi-Rust: a 4x8 dark chess engine.
//!
//! ## Usage
//!
//! - `banqi-rust` - Run a short demo of both search strategies
//! - `banqi-rust protocol` - Start the referee protocol loop on stdin/stdout
//! - `banqi-rust protocol --minimax` - Same, with the alpha-beta strategy

use clap::{Parser, Subcommand};

use banqi_rust::alphabeta::AlphaBeta;
use banqi_rust::board::{Board, Color};
use banqi_rust::mcts::Mcts;
use banqi_rust::protocol::Session;

/// Banqi-Rust: a 4x8 dark chess search engine
#[derive(Parser)]
#[command(name = "banqi-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the referee protocol loop on stdin/stdout
    Protocol {
        /// Use the alpha-beta strategy instead of MCTS
        #[arg(long)]
        minimax: bool,
    },
    /// Run a short demo of both search strategies
    Demo,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Protocol { minimax }) => {
            let mut session = if minimax {
                Session::with_strategy(Box::new(AlphaBeta::new()))
            } else {
                Session::with_strategy(Box::new(Mcts::new()))
            };
            session.run();
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() {
    println!("Banqi-Rust: 4x8 dark chess engine\n");

    let board = Board::start();
    println!("Start position:\n{board}");

    println!("=== MCTS ===");
    let mut mcts = Mcts::new();
    match mcts.choose_move(&board, Color::Red) {
        Some(mv) => println!("chosen move: {mv}"),
        None => println!("no move available"),
    }

    println!("\n=== Alpha-beta ===");
    let mut minimax = AlphaBeta::new();
    minimax.max_depth = 3;
    match minimax.choose_move(&board, Color::Red) {
        Some(mv) => println!("chosen move: {mv}"),
        None => println!("no move available"),
    }
}
