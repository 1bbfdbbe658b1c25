//! Runs - loading raw simulation output
//!
//! Each simulation run writes one file named
//! `<prefix><value>_run<index>.<ext>`, e.g. `tra0.30_run4.txt`, holding one
//! [`DayRecord`](crate::record::DayRecord) per line.
//!
//! ```text
//! data/
//! ├── transmission/   tra0.02_run0.txt  tra0.02_run1.txt ...
//! ├── period/         per1_run0.txt     per1_run1.txt    ...
//! └── mortality/      mor0.01_run0.txt  ...
//! ```

mod filename;
mod loader;
mod param;
mod series;

pub use filename::{RunFileName, PREFIX_LEN};
pub use loader::{RunLoader, DEFAULT_EXTENSION};
pub use param::ParamValue;
pub use series::{RunSeries, RunSeriesBuilder};
