//! The three-state, three-action Q-learning hyper-heuristic that picks a
//! move operator on every annealing step.
//!
//! The state space is the coarse annealing phase (how far through the run
//! we are), not the layout itself -- the agent learns which move kind pays
//! off *early*, *mid* and *late* in a run, the same granularity the
//! population-based trainer this is derived from keys its hyperparameters
//! on generation number.

use rand::Rng;

/// Coarse phase of an annealing run, derived from fractional progress
/// through the temperature schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnealPhase {
    #[default]
    Explore,
    Transition,
    Refine,
}

impl AnnealPhase {
    const COUNT: usize = 3;

    /// Buckets the current-to-initial temperature ratio `T / T0` into a
    /// phase: above 0.66 is still exploring, above 0.33 is transitioning,
    /// at or below 0.33 is refining.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.66 {
            Self::Explore
        } else if ratio > 0.33 {
            Self::Transition
        } else {
            Self::Refine
        }
    }

    fn as_index(self) -> usize {
        match self {
            Self::Explore => 0,
            Self::Transition => 1,
            Self::Refine => 2,
        }
    }
}

/// A move operator kind, chosen by the agent once per annealing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Displace,
    Swap,
    Rotate,
}

impl MoveKind {
    const COUNT: usize = 3;
    const ALL: [Self; 3] = [Self::Displace, Self::Swap, Self::Rotate];

    fn as_index(self) -> usize {
        match self {
            Self::Displace => 0,
            Self::Swap => 1,
            Self::Rotate => 2,
        }
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }
}

/// Clip applied to every reward before it enters the Bellman update, so a
/// single pathological move (e.g. one that resolves a huge overlap) can't
/// dominate the learned values.
const REWARD_CLIP: f64 = 10.0;

/// Epsilon-greedy Q-learning agent over the `(AnnealPhase, MoveKind)`
/// state-action space.
#[derive(Debug, Clone)]
pub struct Agent {
    q: [[f64; MoveKind::COUNT]; AnnealPhase::COUNT],
    epsilon: f64,
    alpha: f64,
    gamma: f64,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(0.2, 0.1, 0.9)
    }
}

impl Agent {
    /// Creates a fresh agent with all Q-values at zero.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon`, `alpha` or `gamma` is outside `[0.0, 1.0]`.
    #[must_use]
    pub fn new(epsilon: f64, alpha: f64, gamma: f64) -> Self {
        assert!((0.0..=1.0).contains(&epsilon));
        assert!((0.0..=1.0).contains(&alpha));
        assert!((0.0..=1.0).contains(&gamma));
        Self {
            q: [[0.0; MoveKind::COUNT]; AnnealPhase::COUNT],
            epsilon,
            alpha,
            gamma,
        }
    }

    /// Chooses the next move kind for `phase`: with probability `epsilon`
    /// a uniformly random action, otherwise the action with the highest
    /// learned value (ties broken toward the lowest action index).
    pub fn choose_action<R: Rng + ?Sized>(&self, phase: AnnealPhase, rng: &mut R) -> MoveKind {
        if rng.random_bool(self.epsilon) {
            let index = rng.random_range(0..MoveKind::COUNT);
            return MoveKind::from_index(index);
        }
        let row = &self.q[phase.as_index()];
        let mut best_index = 0;
        for i in 1..row.len() {
            if row[i] > row[best_index] {
                best_index = i;
            }
        }
        MoveKind::from_index(best_index)
    }

    /// Bellman update for taking `action` in `phase`, observing `reward`
    /// and landing in `next_phase`: `Q += alpha * (r + gamma * max_a' Q' - Q)`.
    pub fn update(&mut self, phase: AnnealPhase, action: MoveKind, reward: f64, next_phase: AnnealPhase) {
        let reward = reward.clamp(-REWARD_CLIP, REWARD_CLIP);
        let best_next = self.q[next_phase.as_index()]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let current = &mut self.q[phase.as_index()][action.as_index()];
        *current += self.alpha * (reward + self.gamma * best_next - *current);
    }

    /// Current learned value of `(phase, action)`, for observability.
    #[must_use]
    pub fn value(&self, phase: AnnealPhase, action: MoveKind) -> f64 {
        self.q[phase.as_index()][action.as_index()]
    }
}
