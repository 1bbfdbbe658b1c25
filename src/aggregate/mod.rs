//! Cross-run aggregation
//!
//! Reduces an [`AlignedGroup`] to an [`AggregatedSeries`]:
//!
//! - per day index and per [`Field`]: mean and population std across runs
//! - once per group: mean and population std of the pre-padding run lengths
//!
//! Fields are reduced independently.

mod series;
mod stats;

pub use series::{AggregatedSeries, DayAggregate};
pub use stats::Summary;

use crate::experiment::ExperimentGroup;
use crate::reconcile::{reconcile, AlignedGroup};
use crate::record::Field;
use crate::{Error, Result};

/// Reduce an aligned group to per-day statistics.
///
/// The output `day` axis is copied from the first run that needed no
/// padding.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the group has no runs.
pub fn aggregate(aligned: &AlignedGroup) -> Result<AggregatedSeries> {
    let empty = || {
        Error::InvalidInput(format!(
            "cannot aggregate {}/{}: group has no runs",
            aligned.family(),
            aligned.value()
        ))
    };

    let run_length = Summary::of_lengths(aligned.original_lengths()).ok_or_else(empty)?;
    let reference = aligned
        .runs()
        .get(aligned.reference_member())
        .ok_or_else(empty)?;

    let mut values = Vec::with_capacity(aligned.run_count());
    let mut per_day = Vec::with_capacity(aligned.len());
    for (index, record) in reference.iter().enumerate() {
        let mut fields = [Summary::default(); 4];
        for field in Field::ALL {
            values.clear();
            values.extend(aligned.column(index).map(|r| r.get(field)));
            fields[field.index()] = Summary::of(&values).ok_or_else(empty)?;
        }
        per_day.push(DayAggregate::from_fields(record.day, fields));
    }

    Ok(AggregatedSeries::new(
        aligned.family(),
        aligned.value(),
        aligned.run_count(),
        run_length,
        per_day,
    ))
}

/// Reconcile and aggregate one experiment group.
///
/// # Errors
///
/// Propagates [`reconcile`] and [`aggregate`] errors.
pub fn aggregate_group(group: &ExperimentGroup) -> Result<AggregatedSeries> {
    let aligned = reconcile(group)?;
    aggregate(&aligned)
}
