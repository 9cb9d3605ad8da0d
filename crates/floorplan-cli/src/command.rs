//! Command-line entry point: parses arguments, loads the CSV inputs,
//! drives `floorplan_solver::anneal`, and reports progress the same way
//! the teacher's `train_ai` command reports generations -- `eprintln!`
//! lines printed at a fixed cadence, not a logging framework.

use std::path::PathBuf;

use floorplan_core::Die;
use floorplan_solver::{SaConfig, anneal};
use floorplan_stats::descriptive::DescriptiveStats;

use crate::{
    adapters::csv,
    output::{Output, PlacementResult},
};

/// How often (in outer iterations) a progress line is printed.
const PROGRESS_STRIDE: usize = 20;

#[derive(Debug, Clone, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Mode {
    /// Place macros on a die and anneal toward a lower-cost layout.
    Place(PlaceArg),
}

#[derive(Debug, Clone, clap::Args)]
struct PlaceArg {
    /// Blocks CSV path (columns: id, width, height, power, heat).
    #[arg(long)]
    blocks: PathBuf,
    /// Nets CSV path (columns: name, blocks, weight); omit for no nets.
    #[arg(long)]
    nets: Option<PathBuf>,
    /// Die width.
    #[arg(long)]
    die_width: f64,
    /// Die height.
    #[arg(long)]
    die_height: f64,
    /// Output JSON path; prints to stdout if omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// RNG seed; omit to seed from OS entropy.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 1000.0)]
    t0: f64,
    #[arg(long, default_value_t = 1e-3)]
    t_final: f64,
    #[arg(long, default_value_t = 0.95)]
    cooling_rate: f64,
    #[arg(long, default_value_t = 100)]
    chain_length: usize,
    #[arg(long, default_value_t = 20.0)]
    move_scale: f64,
    #[arg(long, default_value_t = 1.0)]
    placement_pitch: f64,
}

pub fn run() -> anyhow::Result<()> {
    let args = <CommandArgs as clap::Parser>::parse();
    match args.mode {
        Mode::Place(arg) => run_place(&arg)?,
    }
    Ok(())
}

fn run_place(arg: &PlaceArg) -> anyhow::Result<()> {
    let blocks = csv::load_blocks(&arg.blocks)?;
    let nets = match &arg.nets {
        Some(path) => csv::load_nets(path)?,
        None => Vec::new(),
    };
    let die = Die::new(arg.die_width, arg.die_height)
        .map_err(|err| anyhow::anyhow!("invalid die: {err}"))?;

    let config = SaConfig {
        t0: arg.t0,
        t_final: arg.t_final,
        cooling_rate: arg.cooling_rate,
        chain_length: arg.chain_length,
        move_scale: arg.move_scale,
        placement_pitch: arg.placement_pitch,
        random_seed: Some(arg.seed),
    };

    eprintln!(
        "Placing {} blocks, {} nets on a {}x{} die",
        blocks.len(),
        nets.len(),
        die.width(),
        die.height()
    );

    let result = anneal(&blocks, &nets, &die, &config, |progress| {
        if progress.iteration % PROGRESS_STRIDE == 0 {
            eprintln!(
                "  iter {:5}  T={:>10.3}  cost={:>12.3}  accept={:>5.1}%",
                progress.iteration,
                progress.temperature,
                progress.current_cost,
                progress.acceptance_rate * 100.0
            );
        }
    })
    .map_err(|err| anyhow::anyhow!("invalid annealing configuration: {err}"))?;

    let Some(result) = result else {
        anyhow::bail!(
            "no legal placement exists for {} blocks on a {}x{} die",
            blocks.len(),
            die.width(),
            die.height()
        );
    };

    if let Some(stats) = DescriptiveStats::new(result.cost_history.iter().copied()) {
        eprintln!(
            "Cost history: min={:.3}  max={:.3}  mean={:.3}",
            stats.min, stats.max, stats.mean
        );
    }
    eprintln!(
        "Best cost: {:.3} after {} iterations",
        result.best_cost, result.iterations
    );

    let placement_result = PlacementResult::new(&result, &blocks, &nets, &die);
    Output::save_json(&placement_result, arg.output.clone())?;

    Ok(())
}
