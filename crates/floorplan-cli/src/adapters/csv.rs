//! Blocks/nets CSV loaders.
//!
//! Row structs only bind the columns the core cares about; a header-based
//! [`csv::Reader`] ignores any extra column (e.g. a `role` annotation) on
//! its own, so no manual column filtering is needed here.

use std::path::Path;

use anyhow::Context as _;
use floorplan_core::{Block, BlockId, Net};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BlockRow {
    id: String,
    width: f64,
    height: f64,
    power: f64,
    heat: f64,
}

/// Loads blocks from a CSV file with an `id, width, height, power, heat`
/// header (extra columns are ignored).
pub fn load_blocks(path: &Path) -> anyhow::Result<Vec<Block>> {
    let mut reader = ::csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open blocks CSV: {}", path.display()))?;
    let mut blocks = Vec::new();
    for record in reader.deserialize() {
        let row: BlockRow =
            record.with_context(|| format!("Failed to parse blocks CSV: {}", path.display()))?;
        let block = Block::new(row.id, row.width, row.height, row.power, row.heat)
            .with_context(|| format!("Invalid block in {}", path.display()))?;
        blocks.push(block);
    }
    Ok(blocks)
}

#[derive(Debug, Deserialize)]
struct NetRow {
    name: String,
    blocks: String,
    weight: f64,
}

/// Loads nets from a CSV file with a `name, blocks, weight` header, where
/// `blocks` is a comma-separated block id list.
pub fn load_nets(path: &Path) -> anyhow::Result<Vec<Net>> {
    let mut reader = ::csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open nets CSV: {}", path.display()))?;
    let mut nets = Vec::new();
    for record in reader.deserialize() {
        let row: NetRow =
            record.with_context(|| format!("Failed to parse nets CSV: {}", path.display()))?;
        let ids: Vec<BlockId> = row
            .blocks
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(BlockId::from)
            .collect();
        let net = Net::new_simple(row.name, ids, row.weight)
            .with_context(|| format!("Invalid net in {}", path.display()))?;
        nets.push(net);
    }
    Ok(nets)
}
