//! [`Placement`] and [`Orientations`]: the mutable value objects an
//! optimizer iterates over.
//!
//! Both are thin `BTreeMap` wrappers, not `HashMap`s: the distilled spec
//! requires that block iteration order never depend on hash iteration
//! order, so that floating-point cost sums are bit-reproducible across
//! runs (property P2). `BTreeMap` orders by `BlockId`, giving a fixed,
//! input-independent iteration order for free.

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

use crate::model::BlockId;

/// Lower-left `(x, y)` coordinate of a placed block.
pub type Coord = (f64, f64);

/// A mapping from block identifier to its lower-left placement coordinate.
///
/// Keys form a subset (usually the full set) of the block universe; a
/// block missing from the map is simply not yet placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement(BTreeMap<BlockId, Coord>);

impl Placement {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn get(&self, id: &BlockId) -> Option<Coord> {
        self.0.get(id).copied()
    }

    pub fn insert(&mut self, id: BlockId, coord: Coord) -> Option<Coord> {
        self.0.insert(id, coord)
    }

    #[must_use]
    pub fn contains(&self, id: &BlockId) -> bool {
        self.0.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, BlockId, Coord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Placement {
    type Item = (&'a BlockId, &'a Coord);
    type IntoIter = btree_map::Iter<'a, BlockId, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(BlockId, Coord)> for Placement {
    fn from_iter<I: IntoIterator<Item = (BlockId, Coord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A mapping from block identifier to its `rotated` flag.
///
/// Absence of a key is equivalent to `rotated = false` (see
/// [`Orientations::is_rotated`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Orientations(BTreeMap<BlockId, bool>);

impl Orientations {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns whether `id` is rotated; blocks absent from the map are
    /// treated as not rotated.
    #[must_use]
    pub fn is_rotated(&self, id: &BlockId) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: BlockId, rotated: bool) {
        self.0.insert(id, rotated);
    }

    /// Flips the rotation flag for `id`, returning the new value.
    pub fn flip(&mut self, id: &BlockId) -> bool {
        let new_value = !self.is_rotated(id);
        self.0.insert(id.clone(), new_value);
        new_value
    }

    pub fn iter(&self) -> btree_map::Iter<'_, BlockId, bool> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Orientations {
    type Item = (&'a BlockId, &'a bool);
    type IntoIter = btree_map::Iter<'a, BlockId, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
