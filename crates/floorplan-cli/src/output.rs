//! Result serialization: the JSON document a `place` run emits, replacing
//! the teacher's `AiModel` document with a placement/orientations/cost
//! summary. Uses the same `File` + `serde_json::to_writer_pretty` shape as
//! `AiModel::open`'s write-side counterpart.

use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
};

use anyhow::Context as _;
use floorplan_core::{Block, Die, Net, Orientations, Placement};
use floorplan_cost::{CostBreakdown, cost_breakdown};
use floorplan_solver::SaResult;
use serde::Serialize;

/// The JSON document written by `floorplan place`.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementResult {
    pub placement: Placement,
    pub orientations: Orientations,
    pub cost: CostBreakdown,
    pub iterations: usize,
    /// `current_cost` sampled once per outer (temperature) iteration.
    pub history: Vec<f64>,
}

impl PlacementResult {
    #[must_use]
    pub fn new(result: &SaResult, blocks: &[Block], nets: &[Net], die: &Die) -> Self {
        let cost = cost_breakdown(
            &result.best_state.placement,
            &result.best_state.orientations,
            blocks,
            nets,
            die,
        );
        Self {
            placement: result.best_state.placement.clone(),
            orientations: result.best_state.orientations.clone(),
            cost,
            iterations: result.iterations,
            history: result.cost_history.clone(),
        }
    }
}

/// Writes a serializable value as pretty JSON, either to `path` or, absent
/// a path, to stdout.
pub struct Output;

impl Output {
    pub fn save_json<T: Serialize>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()> {
        match path {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                serde_json::to_writer_pretty(BufWriter::new(file), value)
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            }
            None => {
                serde_json::to_writer_pretty(io::stdout().lock(), value)
                    .context("Failed to write result to stdout")?;
                println!();
            }
        }
        Ok(())
    }
}
