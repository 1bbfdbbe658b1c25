//! Experiment families, groups and the aggregate store
//!
//! ## Schema Overview
//!
//! ```text
//! AggregateStore
//!   └── family (e.g. "transmission")            FamilyAggregates
//!         └── parameter value (e.g. 0.30)       AggregatedSeries
//!               ├── run_length_mean / run_length_std
//!               └── per_day[L]: day + mean/std of S, I, R, D
//! ```
//!
//! An [`ExperimentGroup`] is the input side of one leaf: all runs of one
//! family sharing one parameter value.
//!
//! ## Usage
//!
//! ```rust
//! use sweep_aggregate::experiment::{group_runs, AggregateStore};
//! use sweep_aggregate::aggregate::aggregate_group;
//! use sweep_aggregate::record::DayRecord;
//! use sweep_aggregate::run::{ParamValue, RunSeries};
//!
//! let rate = ParamValue::new(0.1)?;
//! let runs = vec![
//!     RunSeries::new("transmission", rate, vec![DayRecord::new(0, 100.0, 0.0, 0.0, 0.0)]),
//!     RunSeries::new("transmission", rate, vec![DayRecord::new(0, 90.0, 10.0, 0.0, 0.0)]),
//! ];
//!
//! let mut store = AggregateStore::new();
//! for group in group_runs("transmission", runs)?.values() {
//!     store.insert(aggregate_group(group)?);
//! }
//!
//! let series = store.get("transmission", rate).unwrap();
//! assert_eq!(series.day(0).unwrap().susceptible.mean, 95.0);
//! # Ok::<(), sweep_aggregate::Error>(())
//! ```

mod group;
mod store;

pub use group::{group_runs, ExperimentGroup};
pub use store::{AggregateStore, FamilyAggregates};
