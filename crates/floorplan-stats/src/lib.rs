//! Summary statistics over a run's cost history.
//!
//! - [`descriptive`]: min/max/mean/median/variance/std-dev of a dataset
//!
//! # Examples
//!
//! ```
//! use floorplan_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
