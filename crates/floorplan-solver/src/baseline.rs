//! The Smart Wall-Aware Baseline Placer: a deterministic, cost-kernel-free
//! constructive algorithm that produces a legal starting layout.
//!
//! The baseline never consults [`floorplan_cost`]; its own wall/wire/thermal
//! scoring below uses its own constants, deliberately. This keeps the
//! starting point reproducible and cheap even for macro sets the annealer
//! will later re-score by the real objective.

use std::collections::BTreeMap;

use floorplan_core::{Block, BlockId, Die, Net, Placement, Rect, overlaps};

/// Weight on the minimum wall clearance in candidate scoring.
const ALPHA_WALL: f64 = 1000.0;
/// Weight on the connectivity-weighted wire cost in candidate scoring.
const BETA_WIRE: f64 = 5.0;
/// Weight on the pairwise thermal cost in candidate scoring.
const GAMMA_THERMAL: f64 = 5000.0;
/// Raster fallback scan step.
const FALLBACK_STEP: f64 = 1.0;

fn pair_key(a: &BlockId, b: &BlockId) -> (BlockId, BlockId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Symmetric connectivity weight between every pair of blocks that share at
/// least one net, accumulated over all nets they co-occur in.
fn build_adjacency(nets: &[Net]) -> BTreeMap<(BlockId, BlockId), f64> {
    let mut adj = BTreeMap::new();
    for net in nets {
        let members = net.blocks();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                *adj.entry(pair_key(&members[i], &members[j])).or_insert(0.0) += net.weight();
            }
        }
    }
    adj
}

fn adjacency_weight(adj: &BTreeMap<(BlockId, BlockId), f64>, a: &BlockId, b: &BlockId) -> f64 {
    adj.get(&pair_key(a, b)).copied().unwrap_or(0.0)
}

/// Sum of a block's adjacency row: how strongly it is connected to the rest
/// of the netlist.
fn connectivity(adj: &BTreeMap<(BlockId, BlockId), f64>, id: &BlockId) -> f64 {
    adj.iter()
        .filter(|((a, b), _)| a == id || b == id)
        .map(|(_, w)| *w)
        .sum()
}

#[derive(Debug, Clone, Copy)]
struct Placed {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    power: f64,
}

impl Placed {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    fn center(&self) -> (f64, f64) {
        self.rect().center()
    }
}

fn manhattan(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

fn euclid_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

fn is_legal(candidate: Rect, die: &Die, placed: &[(BlockId, Placed)]) -> bool {
    if candidate.x < 0.0
        || candidate.y < 0.0
        || candidate.right() > die.width()
        || candidate.top() > die.height()
    {
        return false;
    }
    placed.iter().all(|(_, p)| !overlaps(&candidate, &p.rect()))
}

/// Generates the four die-corner candidates plus, for every placed
/// rectangle, four anchor points (right/top/left/bottom) abutting it.
///
/// Only these four anchors per neighbor are generated -- not all four
/// corners of the abutment rectangle -- matching the original algorithm
/// this solver is derived from.
fn candidates(w: f64, h: f64, die: &Die, placed: &[(BlockId, Placed)]) -> Vec<(f64, f64)> {
    let mut out = vec![
        (0.0, 0.0),
        (die.width() - w, 0.0),
        (0.0, die.height() - h),
        (die.width() - w, die.height() - h),
    ];
    for (_, p) in placed {
        out.push((p.x + p.w, p.y)); // right
        out.push((p.x, p.y + p.h)); // top
        out.push((p.x - w, p.y)); // left
        out.push((p.x, p.y - h)); // bottom
    }
    out
}

fn score_candidate(
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    power: f64,
    die: &Die,
    id: &BlockId,
    placed: &[(BlockId, Placed)],
    adj: &BTreeMap<(BlockId, BlockId), f64>,
) -> f64 {
    let d_left = x;
    let d_right = die.width() - (x + w);
    let d_bottom = y;
    let d_top = die.height() - (y + h);
    let wall_cost = d_left.min(d_right).min(d_bottom).min(d_top) * ALPHA_WALL;

    let center = (x + w / 2.0, y + h / 2.0);
    let mut wire_cost = 0.0;
    let mut thermal_cost = 0.0;
    for (n_id, n) in placed {
        let weight = adjacency_weight(adj, id, n_id);
        if weight > 0.0 {
            wire_cost += manhattan(center, n.center()).max(1.0) * weight;
        }
        if power > 0.0 && n.power > 0.0 {
            let dist_sq = euclid_sq(center, n.center()).max(1e-9);
            thermal_cost += (power * n.power) / dist_sq;
        }
    }

    wall_cost + wire_cost * BETA_WIRE + thermal_cost * GAMMA_THERMAL
}

fn fallback_scan(w: f64, h: f64, die: &Die, placed: &[(BlockId, Placed)]) -> Option<(f64, f64)> {
    let mut y = 0.0;
    while y <= die.height() - h {
        let mut x = 0.0;
        while x <= die.width() - w {
            let candidate = Rect::new(x, y, w, h);
            if is_legal(candidate, die, placed) {
                return Some((x, y));
            }
            x += FALLBACK_STEP;
        }
        y += FALLBACK_STEP;
    }
    None
}

/// Produces a legal, overlap-free, fully-inside-the-die starting placement
/// for `blocks` on `die`, given the connectivity implied by `nets` (pass an
/// empty slice when there are no nets). Returns `None` if the die is too
/// small to place every block -- this is an ordinary control-flow signal,
/// not an error.
#[must_use]
pub fn baseline_place(blocks: &[Block], die: &Die, nets: &[Net]) -> Option<Placement> {
    let adj = build_adjacency(nets);

    let mut order: Vec<&Block> = blocks.iter().collect();
    order.sort_by(|a, b| {
        let score_a = inflexibility_score(a, &adj);
        let score_b = inflexibility_score(b, &adj);
        score_b.total_cmp(&score_a)
    });

    let mut placed: Vec<(BlockId, Placed)> = Vec::with_capacity(blocks.len());
    let mut placement = Placement::new();

    for block in order {
        let w = block.width();
        let h = block.height();

        let smart_candidates = candidates(w, h, die, &placed);
        let legal: Vec<(f64, f64)> = smart_candidates
            .into_iter()
            .filter(|&(x, y)| is_legal(Rect::new(x, y, w, h), die, &placed))
            .collect();

        let chosen = if legal.is_empty() {
            fallback_scan(w, h, die, &placed)?
        } else {
            legal
                .into_iter()
                .map(|(x, y)| {
                    let score = score_candidate(
                        x,
                        y,
                        w,
                        h,
                        block.power(),
                        die,
                        block.id(),
                        &placed,
                        &adj,
                    );
                    (score, x, y)
                })
                .min_by(|a, b| match a.0.total_cmp(&b.0) {
                    std::cmp::Ordering::Equal => (a.1 + a.2).total_cmp(&(b.1 + b.2)),
                    ord => ord,
                })
                .map(|(_, x, y)| (x, y))
                .expect("legal is non-empty")
        };

        let (x, y) = chosen;
        placed.push((
            block.id().clone(),
            Placed {
                x,
                y,
                w,
                h,
                power: block.power(),
            },
        ));
        placement.insert(block.id().clone(), (x, y));
    }

    Some(placement)
}

/// score = w*h + connectivity(b)*10 + power(b)*10 + max(w,h)*10
fn inflexibility_score(block: &Block, adj: &BTreeMap<(BlockId, BlockId), f64>) -> f64 {
    let w = block.width();
    let h = block.height();
    w * h + connectivity(adj, block.id()) * 10.0 + block.power() * 10.0 + w.max(h) * 10.0
}
