//! Cost term implementations.
//!
//! Each term is a standalone function so [`CostBreakdown`] can report them
//! individually (property P5: `total_cost` is the sum of its components,
//! checkable directly against the struct fields) and so each term can be
//! unit-tested in isolation.

use std::collections::BTreeMap;

use floorplan_core::{
    Block, BlockId, Die, Net, Orientations, Placement, Rect, effective_dims, overlap_dims,
};
use serde::{Deserialize, Serialize};

/// Weight applied to the overlap-area penalty (`w∩ * h∩ * OVERLAP_WEIGHT`).
pub const OVERLAP_WEIGHT: f64 = 1e4;

/// Flat penalty added per block that violates the die boundary.
pub const BOUNDARY_PENALTY: f64 = 1e4;

/// Tolerance used only by the boundary-penalty gate (never by the
/// baseline placer, which is strictly legal by construction).
pub const BOUNDARY_TOLERANCE: f64 = 0.01;

/// Spatial decay constant `K` in the thermal coupling exponential.
pub const THERMAL_SPREAD_K: f64 = 100.0;

/// Temperature above which the thermal penalty kicks in.
pub const MAX_SAFE_TEMP: f64 = 100.0;

/// Distance beyond which an aggressor's contribution is negligible
/// (`sqrt(K * 9.21)`, so that `exp(-9.21) < 1e-4`).
pub const THERMAL_CUTOFF_DIST: f64 = 30.347_981_810_987_037; // sqrt(100.0 * 9.21)

/// Weight applied to the wall-attraction (center) penalty.
pub const CENTER_PENALTY_WEIGHT: f64 = 2500.0;

fn block_index(blocks: &[Block]) -> BTreeMap<&BlockId, &Block> {
    blocks.iter().map(|b| (b.id(), b)).collect()
}

fn center_of(
    id: &BlockId,
    placement: &Placement,
    orientations: &Orientations,
    index: &BTreeMap<&BlockId, &Block>,
) -> Option<(f64, f64)> {
    let block = *index.get(id)?;
    let (x, y) = placement.get(id)?;
    let (w, h) = effective_dims(block, orientations);
    Some((x + w / 2.0, y + h / 2.0))
}

/// Half-perimeter wirelength, summed over nets with at least two placed
/// members and weighted by `net.weight()`.
#[must_use]
pub fn hpwl(
    placement: &Placement,
    orientations: &Orientations,
    blocks: &[Block],
    nets: &[Net],
) -> f64 {
    let index = block_index(blocks);
    let mut total = 0.0;
    for net in nets {
        let mut xs = Vec::with_capacity(net.blocks().len());
        let mut ys = Vec::with_capacity(net.blocks().len());
        for id in net.blocks() {
            if let Some((cx, cy)) = center_of(id, placement, orientations, &index) {
                xs.push(cx);
                ys.push(cy);
            }
        }
        if xs.len() > 1 {
            let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let y_max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let y_min = ys.iter().copied().fold(f64::INFINITY, f64::min);
            total += (x_max - x_min + y_max - y_min) * net.weight();
        }
    }
    total
}

fn placed_rects(
    placement: &Placement,
    orientations: &Orientations,
    blocks: &[Block],
) -> Vec<Option<Rect>> {
    blocks
        .iter()
        .map(|b| {
            placement.get(b.id()).map(|(x, y)| {
                let (w, h) = effective_dims(b, orientations);
                Rect::new(x, y, w, h)
            })
        })
        .collect()
}

/// Pairwise overlap-area penalty over every unordered pair of placed
/// blocks, in input order.
#[must_use]
pub fn overlap_penalty(placement: &Placement, orientations: &Orientations, blocks: &[Block]) -> f64 {
    let rects = placed_rects(placement, orientations, blocks);
    let mut total = 0.0;
    for i in 0..rects.len() {
        let Some(a) = rects[i] else { continue };
        for b in rects.iter().skip(i + 1).copied().flatten() {
            let (ow, oh) = overlap_dims(&a, &b);
            total += ow * oh * OVERLAP_WEIGHT;
        }
    }
    total
}

/// Flat per-block penalty for any placement that crosses the die boundary
/// by more than [`BOUNDARY_TOLERANCE`].
#[must_use]
pub fn boundary_penalty(
    placement: &Placement,
    orientations: &Orientations,
    blocks: &[Block],
    die: &Die,
) -> f64 {
    let mut total = 0.0;
    for block in blocks {
        let Some((x, y)) = placement.get(block.id()) else {
            continue;
        };
        let (w, h) = effective_dims(block, orientations);
        if x < -BOUNDARY_TOLERANCE
            || y < -BOUNDARY_TOLERANCE
            || x + w > die.width() + BOUNDARY_TOLERANCE
            || y + h > die.height() + BOUNDARY_TOLERANCE
        {
            total += BOUNDARY_PENALTY;
        }
    }
    total
}

/// Pairwise thermal-coupling penalty.
///
/// Each placed block is a potential victim; every placed block with
/// `power() > 0` is a potential aggressor (a block can be both). A victim's
/// modeled temperature is its own heat plus an exponentially-decaying
/// contribution from every other aggressor; temperatures above
/// [`MAX_SAFE_TEMP`] are squared-penalized.
///
/// Each block's *own* orientation is used for its own center, for both the
/// victim and every aggressor — reusing the victim's orientation for an
/// aggressor's center (as the reference implementation this was derived
/// from did) is a bug, not a behavior to preserve.
#[must_use]
pub fn thermal_penalty(placement: &Placement, orientations: &Orientations, blocks: &[Block]) -> f64 {
    let index = block_index(blocks);

    let mut aggressors: Vec<(&Block, f64, f64)> = blocks
        .iter()
        .filter(|b| b.power() > 0.0)
        .filter_map(|b| center_of(b.id(), placement, orientations, &index).map(|c| (b, c.0, c.1)))
        .collect();
    aggressors.sort_by(|a, b| a.0.id().cmp(b.0.id()));

    if aggressors.is_empty() {
        return 0.0;
    }

    let manhattan_cutoff = THERMAL_CUTOFF_DIST * std::f64::consts::SQRT_2;
    let dist_sq_cutoff = THERMAL_CUTOFF_DIST * THERMAL_CUTOFF_DIST;

    let mut total = 0.0;
    for victim in blocks {
        let Some((vx, vy)) = center_of(victim.id(), placement, orientations, &index) else {
            continue;
        };
        let mut temp = victim.power() * 10.0;
        for (aggressor, ax, ay) in &aggressors {
            if aggressor.id() == victim.id() {
                continue;
            }
            let manhattan = (vx - ax).abs() + (vy - ay).abs();
            if manhattan > manhattan_cutoff {
                continue;
            }
            let dist_sq = (vx - ax).powi(2) + (vy - ay).powi(2);
            if dist_sq > dist_sq_cutoff {
                continue;
            }
            temp += aggressor.power() * (-dist_sq / THERMAL_SPREAD_K).exp();
        }
        if temp > MAX_SAFE_TEMP {
            total += (temp - MAX_SAFE_TEMP).powi(2);
        }
    }
    total
}

/// Wall-attraction penalty: pushes high-power blocks toward the die
/// periphery by penalizing proximity of their center to the die center,
/// scaled by their power.
#[must_use]
pub fn center_penalty(
    placement: &Placement,
    orientations: &Orientations,
    blocks: &[Block],
    die: &Die,
) -> f64 {
    let index = block_index(blocks);
    let (cx, cy) = (die.width() / 2.0, die.height() / 2.0);
    let max_dist = ((die.width() / 2.0).powi(2) + (die.height() / 2.0).powi(2)).sqrt();

    let mut total = 0.0;
    for block in blocks {
        let Some((bx, by)) = center_of(block.id(), placement, orientations, &index) else {
            continue;
        };
        let dist = ((bx - cx).powi(2) + (by - cy).powi(2)).sqrt();
        let score = 1.0 - dist / max_dist;
        total += score * block.power();
    }
    total * CENTER_PENALTY_WEIGHT
}

/// The five cost terms, kept separate so callers can inspect the
/// contribution of each (property P5: `total()` is their sum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub wirelength: f64,
    pub overlap: f64,
    pub boundary: f64,
    pub thermal: f64,
    pub center: f64,
}

impl CostBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.wirelength + self.overlap + self.boundary + self.thermal + self.center
    }
}

/// Computes all five cost terms over `(placement, orientations)`.
#[must_use]
pub fn cost_breakdown(
    placement: &Placement,
    orientations: &Orientations,
    blocks: &[Block],
    nets: &[Net],
    die: &Die,
) -> CostBreakdown {
    CostBreakdown {
        wirelength: hpwl(placement, orientations, blocks, nets),
        overlap: overlap_penalty(placement, orientations, blocks),
        boundary: boundary_penalty(placement, orientations, blocks, die),
        thermal: thermal_penalty(placement, orientations, blocks),
        center: center_penalty(placement, orientations, blocks, die),
    }
}

/// Total weighted cost of `(placement, orientations)`: the sum of all five
/// terms. See [`cost_breakdown`] for the per-term values.
#[must_use]
pub fn total_cost(
    placement: &Placement,
    orientations: &Orientations,
    blocks: &[Block],
    nets: &[Net],
    die: &Die,
) -> f64 {
    cost_breakdown(placement, orientations, blocks, nets, die).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::Block;

    fn block(id: &str, w: f64, h: f64, power: f64) -> Block {
        Block::new(id, w, h, power, 0.0).unwrap()
    }

    #[test]
    fn hpwl_ignores_nets_with_fewer_than_two_placed_members() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0)];
        let net = Net::new_simple("n", vec!["a".into()], 5.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        let orientations = Orientations::new();
        assert_eq!(hpwl(&placement, &orientations, &blocks, &[net]), 0.0);
    }

    #[test]
    fn hpwl_is_weighted_half_perimeter_of_center_bbox() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0), block("b", 10.0, 10.0, 0.0)];
        let net = Net::new_simple("n", vec!["a".into(), "b".into()], 2.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        placement.insert("b".into(), (20.0, 0.0));
        let orientations = Orientations::new();
        // centers at (5,5) and (25,5): dx=20, dy=0 -> hpwl=20, * weight 2 = 40
        assert_eq!(hpwl(&placement, &orientations, &blocks, &[net]), 40.0);
    }

    #[test]
    fn overlap_penalty_zero_when_disjoint() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0), block("b", 10.0, 10.0, 0.0)];
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        placement.insert("b".into(), (20.0, 0.0));
        let orientations = Orientations::new();
        assert_eq!(overlap_penalty(&placement, &orientations, &blocks), 0.0);
    }

    #[test]
    fn overlap_penalty_scales_with_overlap_area() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0), block("b", 10.0, 10.0, 0.0)];
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        placement.insert("b".into(), (5.0, 5.0));
        let orientations = Orientations::new();
        // overlap rect is 5x5 = 25 area
        assert_eq!(
            overlap_penalty(&placement, &orientations, &blocks),
            25.0 * OVERLAP_WEIGHT
        );
    }

    #[test]
    fn boundary_penalty_flags_out_of_die_blocks() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0)];
        let die = Die::new(100.0, 100.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (95.0, 0.0));
        let orientations = Orientations::new();
        assert_eq!(
            boundary_penalty(&placement, &orientations, &blocks, &die),
            BOUNDARY_PENALTY
        );
    }

    #[test]
    fn boundary_penalty_tolerates_small_epsilon() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0)];
        let die = Die::new(100.0, 100.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (90.005, 0.0));
        let orientations = Orientations::new();
        assert_eq!(
            boundary_penalty(&placement, &orientations, &blocks, &die),
            0.0
        );
    }

    #[test]
    fn thermal_penalty_zero_below_max_safe_temp() {
        let blocks = vec![block("a", 10.0, 10.0, 1.0)];
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        let orientations = Orientations::new();
        assert_eq!(thermal_penalty(&placement, &orientations, &blocks), 0.0);
    }

    #[test]
    fn thermal_penalty_zero_for_far_apart_aggressors() {
        let blocks = vec![block("a", 10.0, 10.0, 50.0), block("b", 10.0, 10.0, 50.0)];
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        placement.insert("b".into(), (90.0, 90.0));
        let orientations = Orientations::new();
        assert_eq!(thermal_penalty(&placement, &orientations, &blocks), 0.0);
    }

    #[test]
    fn thermal_penalty_uses_each_blocks_own_orientation() {
        // `hot` is rotated; if its own orientation were discarded in favor
        // of `victim`'s (the source bug this kernel deliberately does not
        // reproduce), its center -- and thus the computed temperature --
        // would come out different from the value below. Both blocks carry
        // enough power that each crosses `MAX_SAFE_TEMP` from its own
        // self-heating term alone, so the total is the sum of both victims'
        // contributions, not just one.
        let blocks = vec![block("victim", 10.0, 10.0, 60.0), block("hot", 2.0, 20.0, 60.0)];
        let mut placement = Placement::new();
        placement.insert("victim".into(), (0.0, 0.0));
        placement.insert("hot".into(), (15.0, 0.0));
        let mut orientations = Orientations::new();
        orientations.set("hot".into(), true); // hot's effective dims become 20x2
        let cost = thermal_penalty(&placement, &orientations, &blocks);
        assert!((cost - 501_874.660_840_620_34).abs() < 1e-3);
    }

    #[test]
    fn center_penalty_zero_for_zero_power_blocks() {
        let blocks = vec![block("a", 10.0, 10.0, 0.0)];
        let die = Die::new(100.0, 100.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (45.0, 45.0));
        let orientations = Orientations::new();
        assert_eq!(
            center_penalty(&placement, &orientations, &blocks, &die),
            0.0
        );
    }

    #[test]
    fn center_penalty_zero_at_corner() {
        let blocks = vec![block("a", 10.0, 10.0, 25.0)];
        let die = Die::new(100.0, 100.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (90.0, 90.0));
        let orientations = Orientations::new();
        let penalty = center_penalty(&placement, &orientations, &blocks, &die);
        assert!(penalty.abs() < 1e-9);
    }

    #[test]
    fn total_cost_equals_sum_of_breakdown() {
        let blocks = vec![block("a", 10.0, 10.0, 5.0), block("b", 10.0, 10.0, 5.0)];
        let net = Net::new_simple("n", vec!["a".into(), "b".into()], 1.0).unwrap();
        let die = Die::new(100.0, 100.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (0.0, 0.0));
        placement.insert("b".into(), (50.0, 50.0));
        let orientations = Orientations::new();
        let breakdown = cost_breakdown(&placement, &orientations, &blocks, &[net.clone()], &die);
        let total = total_cost(&placement, &orientations, &blocks, &[net], &die);
        assert_eq!(breakdown.total(), total);
    }

    #[test]
    fn symmetry_swapping_identical_blocks_preserves_cost() {
        let blocks = vec![block("a", 10.0, 10.0, 5.0), block("b", 10.0, 10.0, 5.0)];
        let net = Net::new_simple("n", vec!["a".into(), "b".into()], 1.0).unwrap();
        let die = Die::new(100.0, 100.0).unwrap();
        let orientations = Orientations::new();

        let mut p1 = Placement::new();
        p1.insert("a".into(), (10.0, 10.0));
        p1.insert("b".into(), (50.0, 60.0));

        let mut p2 = Placement::new();
        p2.insert("a".into(), (50.0, 60.0));
        p2.insert("b".into(), (10.0, 10.0));

        let c1 = total_cost(&p1, &orientations, &blocks, &[net.clone()], &die);
        let c2 = total_cost(&p2, &orientations, &blocks, &[net], &die);
        assert!((c1 - c2).abs() < 1e-9);
    }

    #[test]
    fn rotation_twice_is_idempotent() {
        let blocks = vec![block("a", 10.0, 4.0, 5.0)];
        let die = Die::new(100.0, 100.0).unwrap();
        let mut placement = Placement::new();
        placement.insert("a".into(), (10.0, 10.0));
        let orientations = Orientations::new();
        let base = total_cost(&placement, &orientations, &blocks, &[], &die);

        let mut twice = orientations.clone();
        twice.flip(&"a".into());
        twice.flip(&"a".into());
        let after = total_cost(&placement, &twice, &blocks, &[], &die);
        assert_eq!(base, after);
    }
}
