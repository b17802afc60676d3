//! Driver session for a referee process.
//!
//! The engine is driven over a line-oriented text protocol: the referee
//! keeps the session's board synchronized by reporting every action either
//! player has made (`play`, `flip`), and asks for the engine's own decision
//! with `genmove`. The session never advances its board on `genmove`; the
//! referee echoes the chosen action back.
//!
//! ## Supported commands
//!
//! - `name` / `version` / `protocol_version` - Identification strings
//! - `list_commands` / `known_command <cmd>` - Introspection
//! - `init` - Reset to the start-of-game position (all face-down)
//! - `setpos <32 cells> <14 counts>` - Resume from a position description
//! - `color <r|b>` - Set the side to move
//! - `time <r|b> <seconds>` - Clock bookkeeping (no search effect)
//! - `play <from> <to>` - An ordinary move/capture was made
//! - `flip <square> <piece>` - A face-down piece was revealed
//! - `genmove` - Ask the engine for its move
//! - `show` - Render the current position
//! - `quit` - Exit the loop
//!
//! Lines may carry an optional numeric id; responses are prefixed with `=`
//! on success and `?` on failure, GTP-style.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail, ensure};

use crate::board::{Board, Color, Piece, parse_square};
use crate::constants::{BOARD_SIZE, PIECE_COUNT};
use crate::mcts::Mcts;
use crate::movegen::Move;
use crate::search::SearchStrategy;

/// The list of known protocol commands.
const KNOWN_COMMANDS: &[&str] = &[
    "color",
    "flip",
    "genmove",
    "init",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "setpos",
    "show",
    "time",
    "version",
];

/// Engine session state: the long-lived board, the side to move, and the
/// clocks, mutated by referee notifications between searches.
pub struct Session {
    board: Board,
    /// Side to move; unknown until the first reveal or an explicit `color`.
    to_move: Option<Color>,
    clocks: [i64; 2],
    strategy: Box<dyn SearchStrategy>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with the default MCTS strategy.
    pub fn new() -> Session {
        Session::with_strategy(Box::new(Mcts::new()))
    }

    pub fn with_strategy(strategy: Box<dyn SearchStrategy>) -> Session {
        Session {
            board: Board::start(),
            to_move: None,
            clocks: [0, 0],
            strategy,
        }
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            let (success, message) = self.execute(&command, args);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(stdout, "\n{prefix}{id_str} {message}\n").unwrap();
            stdout.flush().unwrap();

            if command == "quit" {
                break;
            }
        }
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let digits = trimmed
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_digit())
            .count();
        if digits > 0 {
            if let Ok(id) = trimmed[..digits].parse::<u32>() {
                return (Some(id), trimmed[digits..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "banqi-rust".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1.1.0".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "init" => {
                self.board = Board::start();
                self.to_move = None;
                self.clocks = [0, 0];
                (true, String::new())
            }

            "setpos" => match parse_setpos(args) {
                Ok(board) => {
                    self.board = board;
                    self.to_move = None;
                    (true, String::new())
                }
                Err(e) => (false, e.to_string()),
            },

            "color" => match args.first().and_then(|s| parse_color(s)) {
                Some(color) => {
                    self.to_move = Some(color);
                    (true, String::new())
                }
                None => (false, "expected r or b".to_string()),
            },

            "time" => {
                let color = args.first().and_then(|s| parse_color(s));
                let secs = args.get(1).and_then(|s| s.parse::<i64>().ok());
                match (color, secs) {
                    (Some(color), Some(secs)) => {
                        self.clocks[color.index()] = secs;
                        (true, String::new())
                    }
                    _ => (false, "expected color and seconds".to_string()),
                }
            }

            "play" => {
                let from = args.first().and_then(|s| parse_square(s));
                let to = args.get(1).and_then(|s| parse_square(s));
                match (from, to) {
                    (Some(from), Some(to)) => {
                        self.apply_move(Move::new(from, to));
                        (true, String::new())
                    }
                    _ => (false, "expected two squares".to_string()),
                }
            }

            "flip" => {
                let sq = args.first().and_then(|s| parse_square(s));
                let piece = args
                    .get(1)
                    .and_then(|s| s.chars().next())
                    .and_then(Piece::from_char);
                match (sq, piece) {
                    (Some(sq), Some(piece)) => {
                        self.apply_reveal(sq, piece);
                        (true, String::new())
                    }
                    _ => (false, "expected square and piece".to_string()),
                }
            }

            "genmove" => match self.to_move {
                Some(color) => match self.strategy.choose_move(&self.board, color) {
                    Some(mv) => (true, mv.to_string()),
                    None => (true, "none".to_string()),
                },
                None => (false, "color not set".to_string()),
            },

            "show" => (true, self.render()),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Record an ordinary move made by either player; the turn alternates
    /// once the side to move is known.
    pub fn apply_move(&mut self, mv: Move) {
        self.board.apply_move(mv);
        if let Some(color) = self.to_move {
            self.to_move = Some(color.opponent());
        }
    }

    /// Record a reveal made by either player. The very first reveal of the
    /// game fixes the turn: the flipper owns the revealed color, so the
    /// opposite color moves next.
    pub fn apply_reveal(&mut self, sq: usize, piece: Piece) {
        self.board.apply_reveal(sq, piece);
        self.to_move = Some(match self.to_move {
            Some(color) => color.opponent(),
            None => piece.color.opponent(),
        });
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Option<Color> {
        self.to_move
    }

    /// Remaining clock time reported by the referee, in seconds.
    pub fn clock(&self, color: Color) -> i64 {
        self.clocks[color.index()]
    }

    fn render(&self) -> String {
        let side = match self.to_move {
            Some(Color::Red) => "[RED]",
            Some(Color::Black) => "[BLK]",
            None => "[UNKNOWN]",
        };
        let counts: Vec<String> = self
            .board
            .cover
            .counts
            .iter()
            .map(|c| c.to_string())
            .collect();
        format!("{side} {}\n{}", counts.join(" "), self.board)
    }
}

fn parse_color(s: &str) -> Option<Color> {
    match s.to_lowercase().as_str() {
        "r" | "red" => Some(Color::Red),
        "b" | "blk" | "black" => Some(Color::Black),
        _ => None,
    }
}

/// Parse `setpos` arguments: 32 cell characters followed by 14 face-down
/// counts, cells listed from the top row down as in [`Board::from_description`].
fn parse_setpos(args: &[&str]) -> Result<Board> {
    ensure!(
        args.len() == BOARD_SIZE + PIECE_COUNT,
        "expected {} arguments, got {}",
        BOARD_SIZE + PIECE_COUNT,
        args.len()
    );

    let mut cells = Vec::with_capacity(BOARD_SIZE);
    for arg in &args[..BOARD_SIZE] {
        let mut chars = arg.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            bail!("cell {arg:?} is not a single character");
        };
        cells.push(c);
    }

    let mut counts = Vec::with_capacity(PIECE_COUNT);
    for arg in &args[BOARD_SIZE..] {
        let count: u8 = arg
            .parse()
            .with_context(|| format!("invalid cover count {arg:?}"))?;
        counts.push(count);
    }

    Board::from_description(&cells, &counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, PieceKind};
    use crate::constants::COL_COUNT;

    #[test]
    fn test_parse_id() {
        assert_eq!(Session::parse_id("123 name"), (Some(123), "name"));
        assert_eq!(Session::parse_id("name"), (None, "name"));
    }

    #[test]
    fn test_identification() {
        let mut session = Session::new();
        assert_eq!(session.execute("name", &[]), (true, "banqi-rust".to_string()));
        let (ok, version) = session.execute("protocol_version", &[]);
        assert!(ok);
        assert_eq!(version, "1.1.0");
    }

    #[test]
    fn test_known_command() {
        let mut session = Session::new();
        assert_eq!(session.execute("known_command", &["flip"]).1, "true");
        assert_eq!(session.execute("known_command", &["undo"]).1, "false");
    }

    #[test]
    fn test_first_flip_fixes_turn() {
        let mut session = Session::new();
        assert_eq!(session.to_move(), None);

        // Red king revealed on a1: the flipper plays red, so black is next.
        let (ok, _) = session.execute("flip", &["a1", "K"]);
        assert!(ok);
        assert_eq!(session.to_move(), Some(Color::Black));
        assert_eq!(
            session.board().cells[0],
            Cell::Piece(Piece::new(Color::Red, PieceKind::King))
        );

        let (ok, _) = session.execute("flip", &["a2", "p"]);
        assert!(ok);
        assert_eq!(session.to_move(), Some(Color::Red));
    }

    #[test]
    fn test_play_alternates_turn() {
        let mut session = Session::new();
        session.execute("flip", &["a1", "K"]);
        session.execute("flip", &["a2", "p"]);
        session.execute("play", &["a1", "a2"]);
        assert_eq!(session.to_move(), Some(Color::Black));
        assert_eq!(session.board().cells[0], Cell::Empty);
    }

    #[test]
    fn test_time_updates_clock() {
        let mut session = Session::new();
        let (ok, _) = session.execute("time", &["r", "870"]);
        assert!(ok);
        assert_eq!(session.clock(Color::Red), 870);
        assert_eq!(session.clock(Color::Black), 0);
    }

    #[test]
    fn test_genmove_requires_color() {
        let mut session = Session::new();
        let (ok, msg) = session.execute("genmove", &[]);
        assert!(!ok);
        assert_eq!(msg, "color not set");
    }

    #[test]
    fn test_setpos_roundtrip() {
        let mut session = Session::new();
        let mut args: Vec<String> = Vec::new();
        // Every square empty except a red king on a1, nothing covered. The
        // description lists the top row first, so a1 starts the last row of 8.
        for i in 0..BOARD_SIZE {
            args.push(if i == BOARD_SIZE - COL_COUNT {
                "K".to_string()
            } else {
                "-".to_string()
            });
        }
        for _ in 0..PIECE_COUNT {
            args.push("0".to_string());
        }
        let refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let (ok, msg) = session.execute("setpos", &refs);
        assert!(ok, "{msg}");
        assert_eq!(
            session.board().cells[0],
            Cell::Piece(Piece::new(Color::Red, PieceKind::King))
        );
        assert_eq!(session.board().cover.total, 0);
    }

    #[test]
    fn test_setpos_rejects_wrong_count() {
        let mut session = Session::new();
        let (ok, _) = session.execute("setpos", &["-", "-"]);
        assert!(!ok);
    }
}
