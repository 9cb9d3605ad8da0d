//! Displace: nudge one randomly-chosen block by a bounded random offset,
//! clamped back inside the die and snapped to the placement grid.

use floorplan_core::{Block, Die, clamp_inside, effective_dims, snap};
use rand::Rng;

use crate::PlacementState;

/// Picks one placed block uniformly at random and moves it by an offset
/// drawn from `[-scale, scale]` on each axis, snapping the raw result to
/// `pitch` and then clamping it inside `die`.
///
/// Leaves `state` unchanged if it has no placed blocks.
pub fn apply<R: Rng + ?Sized>(
    state: &PlacementState,
    blocks: &[Block],
    die: &Die,
    scale: f64,
    pitch: f64,
    rng: &mut R,
) -> PlacementState {
    let mut next = state.clone();
    let Some(id) = next.random_placed_id(rng) else {
        return next;
    };
    let Some(block) = blocks.iter().find(|b| b.id() == &id) else {
        return next;
    };
    let (x, y) = next
        .placement
        .get(&id)
        .expect("random_placed_id returns a placed id");
    let dx = rng.random_range(-scale..=scale);
    let dy = rng.random_range(-scale..=scale);
    let (raw_x, raw_y) = (snap(x + dx, pitch), snap(y + dy, pitch));
    let (w, h) = effective_dims(block, &next.orientations);
    let (cx, cy) = clamp_inside(raw_x, raw_y, w, h, die, pitch);
    next.placement.insert(id, (cx, cy));
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{Orientations, Placement};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    #[test]
    fn displaced_block_stays_inside_die() {
        let die = Die::new(50.0, 50.0).unwrap();
        let blocks = vec![Block::new("a", 10.0, 10.0, 0.0, 0.0).unwrap()];
        let mut placement = Placement::new();
        placement.insert("a".into(), (45.0, 45.0));
        let state = PlacementState {
            placement,
            orientations: Orientations::new(),
        };
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let next = apply(&state, &blocks, &die, 20.0, 1.0, &mut rng);
            let (x, y) = next.placement.get(&"a".into()).unwrap();
            assert!(x >= 0.0 && x <= 40.0);
            assert!(y >= 0.0 && y <= 40.0);
        }
    }

    #[test]
    fn empty_state_is_unchanged() {
        let die = Die::new(50.0, 50.0).unwrap();
        let state = PlacementState {
            placement: Placement::new(),
            orientations: Orientations::new(),
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let next = apply(&state, &[], &die, 20.0, 1.0, &mut rng);
        assert!(next.placement.is_empty());
    }
}
