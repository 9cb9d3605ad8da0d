//! Constructs a legal starting floorplan and improves it by simulated
//! annealing steered by a small Q-learning hyper-heuristic.
//!
//! - [`baseline`] - the Smart Wall-Aware constructive placer (no cost
//!   kernel involved)
//! - [`agent`] - the three-state, three-action Q-learning move selector
//! - [`move_ops`] - the Displace, Swap and Rotate move operators
//! - [`sa`] - the annealing driver that ties the above together and
//!   evaluates every candidate against [`floorplan_cost`]

use floorplan_core::{BlockId, Orientations, Placement};
use rand::{Rng, seq::IndexedRandom as _};

pub mod agent;
pub mod baseline;
pub mod move_ops;
pub mod sa;

pub use agent::{Agent, AnnealPhase, MoveKind};
pub use baseline::baseline_place;
pub use sa::{InvalidConfig, IterationProgress, SaConfig, SaResult, anneal};

/// A placement paired with the orientation flags it was produced with --
/// the unit of state a move operator transforms and the cost kernel scores.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementState {
    pub placement: Placement,
    pub orientations: Orientations,
}

impl PlacementState {
    #[must_use]
    pub fn new(placement: Placement, orientations: Orientations) -> Self {
        Self {
            placement,
            orientations,
        }
    }

    /// Returns one placed block id chosen uniformly at random, or `None`
    /// if nothing is placed yet.
    pub fn random_placed_id<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BlockId> {
        let ids: Vec<&BlockId> = self.placement.iter().map(|(id, _)| id).collect();
        ids.choose(rng).map(|id| (*id).clone())
    }
}
