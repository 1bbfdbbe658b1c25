//! # sweep-aggregate: Cross-Run Aggregation for Epidemic Parameter Sweeps
//!
//! **Version**: 0.1.0
//!
//! A stochastic epidemic simulation is run many times per parameter
//! configuration. Each run writes a day-indexed series of population counts
//! (susceptible, infected, recovered, dead), and runs end on different days
//! because epidemics burn out at different times. sweep-aggregate turns
//! those ragged series into one aggregated series per configuration.
//!
//! ## Pipeline
//!
//! ```text
//! record ─► run ─► experiment::group_runs ─► reconcile ─► aggregate ─► AggregateStore
//! (line)   (file)   (family, parameter)      (pad to L)   (mean/std)
//! ```
//!
//! - Shorter runs are padded by holding their last record (terminal state),
//!   `day` field included
//! - Per day and per field: arithmetic mean and population standard deviation
//! - Run-length mean/std use the lengths before padding
//! - Malformed input and empty runs abort the pass; nothing is dropped silently
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sweep_aggregate::Pipeline;
//! use sweep_aggregate::record::Field;
//! use sweep_aggregate::run::ParamValue;
//!
//! let store = Pipeline::builder()
//!     .families(["transmission", "period", "mortality"])
//!     .build()?
//!     .run("analysis/data")?;
//!
//! if let Some(series) = store.get("transmission", ParamValue::new(0.1)?) {
//!     println!("peak mean infected: {:?}", series
//!         .means(Field::Infected)
//!         .into_iter()
//!         .fold(f64::NEG_INFINITY, f64::max));
//! }
//! # Ok::<(), sweep_aggregate::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod error;
pub mod experiment;
pub mod pipeline;
pub mod reconcile;
pub mod record;
pub mod run;
pub mod storage;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineBuilder};
