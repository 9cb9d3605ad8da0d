//! Rotate: flip one randomly-chosen block's orientation, re-clamping it
//! inside the die since a 90-degree flip swaps its effective width and
//! height.

use floorplan_core::{Block, Die, clamp_inside, effective_dims};
use rand::Rng;

use crate::PlacementState;

/// Picks one placed block uniformly at random, flips its rotation flag and
/// clamps it back inside `die` at the resulting effective dimensions.
/// Leaves `state` unchanged if it has no placed blocks.
pub fn apply<R: Rng + ?Sized>(
    state: &PlacementState,
    blocks: &[Block],
    die: &Die,
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
    next.orientations.flip(&id);
    let (x, y) = next.placement.get(&id).expect("id is placed");
    let (w, h) = effective_dims(block, &next.orientations);
    let (cx, cy) = clamp_inside(x, y, w, h, die, pitch);
    next.placement.insert(id, (cx, cy));
    next
}
