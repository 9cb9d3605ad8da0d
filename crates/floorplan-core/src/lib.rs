//! Data model and geometry primitives for macro floorplanning.
//!
//! This crate provides the immutable description of the placement problem
//! (blocks, nets, die) and the read-only geometric helpers used throughout
//! the workspace:
//!
//! - [`model`] - Block, Net, Die and their constructor validation
//! - [`placement`] - Placement and Orientations value types
//! - [`geometry`] - effective dimensions, grid snapping, overlap tests
//!
//! Blocks, Nets and Die are created once by an input adapter and treated as
//! read-only for the lifetime of a run. Placement and Orientations are
//! small value objects copied between optimizer iterations.

pub use self::{geometry::*, model::*, placement::*};

pub mod geometry;
pub mod model;
pub mod placement;
