//! Monte Carlo Tree Search over banqi positions.
//!
//! The search builds an explicit tree for one decision:
//! - **Selection**: descend to a childless node, at each step taking the
//!   child with the highest UCB1 score (unvisited children first).
//! - **Expansion**: materialize one child per legal action, resolving
//!   reveals through the engine's [`RevealPolicy`].
//! - **Simulation**: run one uniform-random playout from one of the new
//!   children and grade it with the terminal-aware material score, always
//!   from the root color's perspective.
//! - **Backpropagation**: add the playout score and a visit to every node on
//!   the selected path. A node with no legal actions backpropagates a
//!   zero-score visit instead.
//!
//! Nodes own their children outright (`Vec<TreeNode>`); selection carries the
//! parent visit count down instead of holding parent back-pointers, and the
//! whole tree is dropped once the best root move is extracted.

use crate::board::{Board, Color};
use crate::constants::{ITERATION_COUNT, SIMULATION_DEPTH, UCB_C};
use crate::eval::evaluate;
use crate::movegen::{Move, find_winning_capture, generate_moves};
use crate::playout::playout;
use crate::reveal::{RevealPolicy, SampledReveal};
use crate::search::SearchStrategy;

/// A node in the search tree.
pub struct TreeNode {
    /// Position at this node (cells plus face-down inventory).
    pub board: Board,
    /// Color to move at this node.
    pub color: Color,
    /// Action that produced this node (`None` at the root).
    pub mv: Option<Move>,
    /// Number of backpropagations through this node.
    pub visits: u32,
    /// Accumulated playout scores, from the root color's perspective.
    pub value: f64,
    /// Static material score of this board, from the root color's perspective.
    pub material: i32,
    /// Owned children, one per legal action at expansion time.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(board: Board, color: Color, mv: Option<Move>, material: i32) -> TreeNode {
        TreeNode {
            board,
            color,
            mv,
            visits: 0,
            value: 0.0,
            material,
            children: Vec::new(),
        }
    }

    /// Mean playout score; 0 for an unvisited node.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits > 0 {
            self.value / self.visits as f64
        } else {
            0.0
        }
    }
}

/// UCB1 score of a child: mean plus the exploration bonus. Unvisited
/// children have infinite priority.
fn ucb1(child: &TreeNode, parent_visits: u32, c: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    let exploration = ((parent_visits.max(1) as f64).ln() / child.visits as f64).sqrt();
    child.mean() + c * exploration
}

/// Index of the child with the highest UCB1 score.
fn most_urgent(children: &[TreeNode], parent_visits: u32, c: f64) -> usize {
    children
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            ucb1(a, parent_visits, c)
                .partial_cmp(&ucb1(b, parent_visits, c))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Descend to a childless node, returning the path of child indices.
fn descend(root: &TreeNode, c: f64) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = root;
    while !node.children.is_empty() {
        let idx = most_urgent(&node.children, node.visits, c);
        path.push(idx);
        node = &node.children[idx];
    }
    path
}

/// Follow a path of child indices to its node.
fn node_at_mut<'a>(root: &'a mut TreeNode, path: &[usize]) -> &'a mut TreeNode {
    path.iter().fold(root, |node, &idx| &mut node.children[idx])
}

/// Add one visit and `score` to every node along the path, root included.
fn backprop(root: &mut TreeNode, path: &[usize], score: f64) {
    let mut node = root;
    node.visits += 1;
    node.value += score;
    for &idx in path {
        node = &mut node.children[idx];
        node.visits += 1;
        node.value += score;
    }
}

/// MCTS engine.
pub struct Mcts<P = SampledReveal> {
    /// Number of search iterations per decision.
    pub iterations: usize,
    /// Playout length in plies.
    pub sim_depth: usize,
    /// UCB1 exploration constant.
    pub exploration: f64,
    policy: P,
    rng: fastrand::Rng,
}

impl Default for Mcts<SampledReveal> {
    fn default() -> Self {
        Self::new()
    }
}

impl Mcts<SampledReveal> {
    pub fn new() -> Mcts<SampledReveal> {
        Mcts {
            iterations: ITERATION_COUNT,
            sim_depth: SIMULATION_DEPTH,
            exploration: UCB_C,
            policy: SampledReveal::new(),
            rng: fastrand::Rng::new(),
        }
    }

    /// Seeded engine for reproducible runs.
    pub fn with_seed(seed: u64) -> Mcts<SampledReveal> {
        Mcts {
            iterations: ITERATION_COUNT,
            sim_depth: SIMULATION_DEPTH,
            exploration: UCB_C,
            policy: SampledReveal::with_seed(seed.wrapping_add(1)),
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl<P: RevealPolicy> Mcts<P> {
    /// Engine with an explicit reveal policy.
    pub fn with_policy(iterations: usize, sim_depth: usize, policy: P) -> Mcts<P> {
        Mcts {
            iterations,
            sim_depth,
            exploration: UCB_C,
            policy,
            rng: fastrand::Rng::new(),
        }
    }

    /// Build and search a fresh tree for one decision, returning its root.
    pub fn search_tree(&mut self, board: &Board, color: Color) -> TreeNode {
        let mut root = TreeNode::new(board.clone(), color, None, 0);
        for _ in 0..self.iterations {
            self.iterate(&mut root, color);
        }
        root
    }

    /// Run the search and pick the root child maximizing static material
    /// plus mean playout score.
    ///
    /// When exactly one revealed enemy piece remains and a root move takes
    /// it, that move is returned without searching at all.
    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        if let Some(mv) = find_winning_capture(board, color) {
            return Some(mv);
        }
        let moves = generate_moves(board, color);
        if moves.is_empty() {
            return None;
        }

        let root = self.search_tree(board, color);
        dump_children(&root);
        let best = root
            .children
            .iter()
            .filter(|child| child.visits > 0)
            .max_by(|a, b| {
                let sa = a.material as f64 + a.mean();
                let sb = b.material as f64 + b.mean();
                sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .and_then(|child| child.mv);

        // A budget too small to visit any child still yields a legal move.
        best.or_else(|| moves.into_iter().next())
    }

    /// One selection/expansion/simulation/backpropagation pass. Exactly one
    /// backpropagation reaches the root per pass.
    fn iterate(&mut self, root: &mut TreeNode, root_color: Color) {
        let mut path = descend(root, self.exploration);
        let leaf = node_at_mut(root, &path);

        let moves = generate_moves(&leaf.board, leaf.color);
        if moves.is_empty() {
            // Terminal node: a zero-score visit, nothing to expand.
            backprop(root, &path, 0.0);
            return;
        }

        for mv in moves {
            let mut child_board = leaf.board.clone();
            if mv.is_reveal() {
                let Some(piece) = self.policy.sample(&child_board.cover) else {
                    continue; // infeasible reveal
                };
                child_board.apply_reveal(mv.to, piece);
            } else {
                child_board.apply_move(mv);
            }
            let material = evaluate(&child_board, root_color);
            leaf.children.push(TreeNode::new(
                child_board,
                leaf.color.opponent(),
                Some(mv),
                material,
            ));
        }
        if leaf.children.is_empty() {
            backprop(root, &path, 0.0);
            return;
        }

        let pick = self.rng.usize(..leaf.children.len());
        let child = &leaf.children[pick];
        let (sim_board, sim_color) = (child.board.clone(), child.color);
        let score = playout(
            sim_board,
            sim_color,
            self.sim_depth,
            root_color,
            &mut self.policy,
            &mut self.rng,
        );

        path.push(pick);
        backprop(root, &path, score as f64);
    }
}

impl<P: RevealPolicy> SearchStrategy for Mcts<P> {
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        Mcts::choose_move(self, board, color)
    }

    fn name(&self) -> &'static str {
        "mcts"
    }
}

/// Write the root children's statistics to stderr.
pub fn dump_children(root: &TreeNode) {
    for child in &root.children {
        if let Some(mv) = child.mv {
            eprintln!(
                "move {mv} visits={} mean={:.1} material={}",
                child.visits,
                child.mean(),
                child.material
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, parse_square};

    fn put(board: &mut Board, sq: &str, c: char) {
        board.cells[parse_square(sq).unwrap()] = Cell::from_char(c).unwrap();
    }

    #[test]
    fn test_ucb1_prefers_unvisited() {
        let board = Board::empty();
        let mut a = TreeNode::new(board.clone(), Color::Red, None, 0);
        a.visits = 5;
        a.value = 100.0;
        let b = TreeNode::new(board, Color::Red, None, 0);
        assert!(ucb1(&b, 10, UCB_C) > ucb1(&a, 10, UCB_C));
    }

    #[test]
    fn test_backprop_updates_whole_path() {
        let board = Board::empty();
        let mut root = TreeNode::new(board.clone(), Color::Red, None, 0);
        root.children
            .push(TreeNode::new(board.clone(), Color::Black, None, 0));
        root.children[0]
            .children
            .push(TreeNode::new(board, Color::Red, None, 0));

        backprop(&mut root, &[0, 0], 7.0);
        assert_eq!(root.visits, 1);
        assert_eq!(root.children[0].visits, 1);
        assert_eq!(root.children[0].children[0].visits, 1);
        assert_eq!(root.children[0].children[0].value, 7.0);
    }

    #[test]
    fn test_winning_capture_shortcut() {
        let mut board = Board::empty();
        put(&mut board, "a1", 'K');
        put(&mut board, "a2", 'g');
        // Zero iterations: only the shortcut can produce a move.
        let mut engine = Mcts::with_policy(0, 0, SampledReveal::with_seed(3));
        let mv = engine.choose_move(&board, Color::Red).unwrap();
        assert_eq!(mv.from, parse_square("a1").unwrap());
        assert_eq!(mv.to, parse_square("a2").unwrap());
    }

    #[test]
    fn test_zero_iterations_still_yields_a_legal_move() {
        // Two enemy pieces, so the shortcut stays out of the way.
        let mut board = Board::empty();
        put(&mut board, "d2", 'R');
        put(&mut board, "d3", 'n');
        put(&mut board, "h4", 'k');

        let mut engine = Mcts::with_policy(0, 0, SampledReveal::with_seed(1));
        let mv = engine.choose_move(&board, Color::Red).unwrap();
        assert!(generate_moves(&board, Color::Red).contains(&mv));
    }

    #[test]
    fn test_no_legal_moves_returns_none() {
        let mut board = Board::empty();
        put(&mut board, "a1", 'G');
        put(&mut board, "a2", 'k');
        put(&mut board, "b1", 'k');
        let mut engine = Mcts::with_seed(9);
        assert_eq!(engine.choose_move(&board, Color::Red), None);
    }
}
