//! Swap: exchange the placed coordinates of two distinct, randomly-chosen
//! blocks, each re-clamped under its own effective dimensions.
//!
//! A swap between differently-sized blocks can put either one out of the
//! die if left unclamped (e.g. a large block landing at a small block's
//! corner anchor); clamping, not the cost kernel, keeps every move legal
//! on the grid, the same contract [`crate::move_ops::displace`] and
//! [`crate::move_ops::rotate`] honor.

use floorplan_core::{Block, Die, clamp_inside, effective_dims};
use rand::{Rng, seq::IndexedRandom as _};

use crate::PlacementState;

/// Swaps the placed positions of two distinct blocks chosen uniformly at
/// random, clamping each to stay inside `die` under its own effective
/// dimensions (current orientations). Leaves `state` unchanged if it has
/// fewer than two placed blocks.
pub fn apply<R: Rng + ?Sized>(
    state: &PlacementState,
    blocks: &[Block],
    die: &Die,
    pitch: f64,
    rng: &mut R,
) -> PlacementState {
    let mut next = state.clone();
    let ids: Vec<_> = next.placement.iter().map(|(id, _)| id.clone()).collect();
    if ids.len() < 2 {
        return next;
    }
    let a = ids.choose(rng).expect("ids is non-empty").clone();
    let b = loop {
        let candidate = ids.choose(rng).expect("ids is non-empty");
        if *candidate != a {
            break candidate.clone();
        }
    };
    let coord_a = next.placement.get(&a).expect("a is placed");
    let coord_b = next.placement.get(&b).expect("b is placed");

    for (id, coord) in [(&a, coord_b), (&b, coord_a)] {
        let (cx, cy) = if let Some(block) = blocks.iter().find(|blk| blk.id() == id) {
            let (w, h) = effective_dims(block, &next.orientations);
            clamp_inside(coord.0, coord.1, w, h, die, pitch)
        } else {
            coord
        };
        next.placement.insert(id.clone(), (cx, cy));
    }
    next
}
