//! Immutable problem inputs: [`Block`], [`Net`], [`Die`].
//!
//! These types are constructed once by an input adapter (a CSV loader, a
//! test fixture, ...) and then treated as read-only for the entire
//! optimization run. Constructors validate their invariants and return a
//! `Result` rather than panicking, since malformed input is an ordinary,
//! expected failure mode at the system boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a [`Block`].
///
/// A thin wrapper around `String` so block identifiers can't be confused
/// with net names or other free-floating strings at call sites.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A rigid rectangular macro to be placed on the die.
///
/// Width, height, power and heat are fixed at construction; the only thing
/// that changes across a run is *where* (a [`Placement`](crate::Placement))
/// and *how* (an [`Orientations`](crate::Orientations) flag) a block sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    width: f64,
    height: f64,
    power: f64,
    heat: f64,
}

/// Error returned when [`Block::new`]'s invariants are violated.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidBlock {
    /// `width` was not strictly positive.
    #[display("block {id}: width must be positive, got {width}")]
    NonPositiveWidth { id: BlockId, width: f64 },
    /// `height` was not strictly positive.
    #[display("block {id}: height must be positive, got {height}")]
    NonPositiveHeight { id: BlockId, height: f64 },
    /// `power` was negative.
    #[display("block {id}: power must be non-negative, got {power}")]
    NegativePower { id: BlockId, power: f64 },
    /// `heat` was negative.
    #[display("block {id}: heat must be non-negative, got {heat}")]
    NegativeHeat { id: BlockId, heat: f64 },
}

impl Block {
    /// Creates a new block, validating width > 0, height > 0, power >= 0
    /// and heat >= 0.
    pub fn new(
        id: impl Into<BlockId>,
        width: f64,
        height: f64,
        power: f64,
        heat: f64,
    ) -> Result<Self, InvalidBlock> {
        let id = id.into();
        if !(width > 0.0) {
            return Err(InvalidBlock::NonPositiveWidth { id, width });
        }
        if !(height > 0.0) {
            return Err(InvalidBlock::NonPositiveHeight { id, height });
        }
        if power < 0.0 {
            return Err(InvalidBlock::NegativePower { id, power });
        }
        if heat < 0.0 {
            return Err(InvalidBlock::NegativeHeat { id, heat });
        }
        Ok(Self {
            id,
            width,
            height,
            power,
            heat,
        })
    }

    #[must_use]
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn power(&self) -> f64 {
        self.power
    }

    #[must_use]
    pub fn heat(&self) -> f64 {
        self.heat
    }
}

/// A weighted hyperedge connecting two or more blocks.
///
/// `halo` is preserved from the input but unused by the cost kernel (see
/// the distilled spec's data model notes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    name: String,
    blocks: Vec<BlockId>,
    weight: f64,
    halo: f64,
}

/// Error returned when [`Net::new`]'s invariants are violated.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidNet {
    /// The net's block list was empty.
    #[display("net {name}: must connect at least one block")]
    EmptyBlockList { name: String },
    /// `weight` was negative.
    #[display("net {name}: weight must be non-negative, got {weight}")]
    NegativeWeight { name: String, weight: f64 },
}

impl Net {
    /// Creates a new net with an explicit halo (see [`Net::new_simple`] for
    /// the common zero-halo case).
    pub fn new(
        name: impl Into<String>,
        blocks: Vec<BlockId>,
        weight: f64,
        halo: f64,
    ) -> Result<Self, InvalidNet> {
        let name = name.into();
        if blocks.is_empty() {
            return Err(InvalidNet::EmptyBlockList { name });
        }
        if weight < 0.0 {
            return Err(InvalidNet::NegativeWeight { name, weight });
        }
        Ok(Self {
            name,
            blocks,
            weight,
            halo,
        })
    }

    /// Creates a new net with `halo = 0.0`.
    pub fn new_simple(
        name: impl Into<String>,
        blocks: Vec<BlockId>,
        weight: f64,
    ) -> Result<Self, InvalidNet> {
        Self::new(name, blocks, weight, 0.0)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub fn halo(&self) -> f64 {
        self.halo
    }
}

/// The rectangular chip area, origin implicitly at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Die {
    width: f64,
    height: f64,
}

/// Error returned when [`Die::new`]'s invariants are violated.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidDie {
    #[display("die width must be positive, got {0}")]
    NonPositiveWidth(f64),
    #[display("die height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

impl Die {
    pub fn new(width: f64, height: f64) -> Result<Self, InvalidDie> {
        if !(width > 0.0) {
            return Err(InvalidDie::NonPositiveWidth(width));
        }
        if !(height > 0.0) {
            return Err(InvalidDie::NonPositiveHeight(height));
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_rejects_non_positive_dims() {
        assert!(Block::new("a", 0.0, 10.0, 0.0, 0.0).is_err());
        assert!(Block::new("a", 10.0, -1.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn block_rejects_negative_power_and_heat() {
        assert!(Block::new("a", 10.0, 10.0, -1.0, 0.0).is_err());
        assert!(Block::new("a", 10.0, 10.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn block_accepts_valid_input() {
        let b = Block::new("a", 10.0, 5.0, 1.0, 2.0).unwrap();
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 5.0);
    }

    #[test]
    fn net_rejects_empty_block_list() {
        assert!(Net::new_simple("n", vec![], 1.0).is_err());
    }

    #[test]
    fn net_rejects_negative_weight() {
        assert!(Net::new_simple("n", vec!["a".into()], -1.0).is_err());
    }

    #[test]
    fn die_rejects_non_positive_dims() {
        assert!(Die::new(0.0, 10.0).is_err());
        assert!(Die::new(10.0, 0.0).is_err());
    }
}
