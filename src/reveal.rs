//! Hidden-information resolution for reveal actions.
//!
//! When search explores a reveal it must decide which of the fourteen piece
//! identities turns face-up. The true game state is unknown, so both engines
//! ask a [`RevealPolicy`] instead of branching over every possibility:
//!
//! - [`SampledReveal`] draws one identity uniformly, the approximation the
//!   engines use in play. It trades exactness for branching factor and is a
//!   deliberate source of search noise.
//! - [`ExpectedReveal`] yields the full inventory-weighted distribution, for
//!   expectimax-style minimax.
//! - [`ScriptedReveal`] replays a fixed sequence, for reproducible tests.

use crate::board::{CoverCounts, Piece};
use crate::constants::PIECE_COUNT;

/// Decides the identity of a revealed piece during search.
pub trait RevealPolicy {
    /// Draw a single identity consistent with the remaining inventory, or
    /// `None` when nothing is left face-down (the caller skips the branch).
    fn sample(&mut self, cover: &CoverCounts) -> Option<Piece>;

    /// The weighted outcomes a searcher should branch over. The default is
    /// the single sample with weight 1.0; [`ExpectedReveal`] overrides this
    /// with the full distribution.
    fn outcomes(&mut self, cover: &CoverCounts) -> Vec<(Piece, f64)> {
        match self.sample(cover) {
            Some(piece) => vec![(piece, 1.0)],
            None => Vec::new(),
        }
    }
}

/// Fall back to the first identity (in inventory order) that is still
/// face-down.
fn first_remaining(cover: &CoverCounts) -> Option<Piece> {
    (0..PIECE_COUNT)
        .map(Piece::from_index)
        .find(|&p| cover.get(p) > 0)
}

/// Uniform single-sample resolution.
///
/// Draws uniformly among the fourteen identities; a drawn identity with an
/// exhausted inventory falls back to the first identity with copies left.
pub struct SampledReveal {
    rng: fastrand::Rng,
}

impl Default for SampledReveal {
    fn default() -> Self {
        Self::new()
    }
}

impl SampledReveal {
    pub fn new() -> SampledReveal {
        SampledReveal {
            rng: fastrand::Rng::new(),
        }
    }

    /// Seeded variant for reproducible runs.
    pub fn with_seed(seed: u64) -> SampledReveal {
        SampledReveal {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl RevealPolicy for SampledReveal {
    fn sample(&mut self, cover: &CoverCounts) -> Option<Piece> {
        if cover.is_empty() {
            return None;
        }
        let drawn = Piece::from_index(self.rng.usize(..PIECE_COUNT));
        if cover.get(drawn) > 0 {
            Some(drawn)
        } else {
            first_remaining(cover)
        }
    }
}

/// Full-expectation resolution: every identity with copies left, weighted by
/// its share of the remaining face-down pieces.
#[derive(Default)]
pub struct ExpectedReveal;

impl RevealPolicy for ExpectedReveal {
    fn sample(&mut self, cover: &CoverCounts) -> Option<Piece> {
        first_remaining(cover)
    }

    fn outcomes(&mut self, cover: &CoverCounts) -> Vec<(Piece, f64)> {
        if cover.is_empty() {
            return Vec::new();
        }
        let total = cover.total as f64;
        (0..PIECE_COUNT)
            .map(Piece::from_index)
            .filter(|&p| cover.get(p) > 0)
            .map(|p| (p, cover.get(p) as f64 / total))
            .collect()
    }
}

/// Replays a fixed identity sequence, cycling when exhausted. Identities
/// without inventory fall back exactly like [`SampledReveal`], so a scripted
/// search stays consistent with the quota invariant.
pub struct ScriptedReveal {
    script: Vec<Piece>,
    next: usize,
}

impl ScriptedReveal {
    pub fn new(script: Vec<Piece>) -> ScriptedReveal {
        ScriptedReveal { script, next: 0 }
    }
}

impl RevealPolicy for ScriptedReveal {
    fn sample(&mut self, cover: &CoverCounts) -> Option<Piece> {
        if cover.is_empty() || self.script.is_empty() {
            return first_remaining(cover);
        }
        let drawn = self.script[self.next % self.script.len()];
        self.next += 1;
        if cover.get(drawn) > 0 {
            Some(drawn)
        } else {
            first_remaining(cover)
        }
    }
}
