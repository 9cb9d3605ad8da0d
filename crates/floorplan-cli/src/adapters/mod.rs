//! I/O adapters that turn flat files into the core data model. Kept
//! separate from `command` so the core crates never need to know a CSV
//! reader exists.

pub mod csv;
