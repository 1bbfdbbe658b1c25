//! Length reconciliation for ragged run groups
//!
//! Stochastic runs terminate on different days: an epidemic that burns out
//! stops reporting. Before per-day statistics are defined, every run in a
//! group is brought to the length `L` of the longest one by repeating its
//! last record.
//!
//! A terminated epidemic stays in its terminal state, so the held record is
//! the continuation. The `day` field is copied with the record and is not
//! renumbered. No zero-fill, no extrapolation.

use crate::experiment::ExperimentGroup;
use crate::record::DayRecord;
use crate::run::ParamValue;
use crate::{Error, Result};

/// Extend `records` to `target` entries by repeating its last record.
///
/// Returns a new series; the input is untouched. A series already at least
/// `target` long is copied as-is. Returns `None` for an empty series, which
/// has no terminal state to hold.
///
/// # Example
///
/// ```rust
/// use sweep_aggregate::record::DayRecord;
/// use sweep_aggregate::reconcile::pad_to_length;
///
/// let run = vec![DayRecord::new(0, 9.0, 1.0, 0.0, 0.0), DayRecord::new(1, 9.0, 0.0, 1.0, 0.0)];
/// let padded = pad_to_length(&run, 4).unwrap();
/// assert_eq!(padded.len(), 4);
/// assert_eq!(padded[3], run[1]);
/// assert_eq!(padded[3].day, 1);
/// ```
#[must_use]
pub fn pad_to_length(records: &[DayRecord], target: usize) -> Option<Vec<DayRecord>> {
    let last = *records.last()?;
    let len = target.max(records.len());
    let mut padded = Vec::with_capacity(len);
    padded.extend_from_slice(records);
    padded.resize(len, last);
    Some(padded)
}

/// An experiment group whose members all have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedGroup {
    family: String,
    value: ParamValue,
    runs: Vec<Vec<DayRecord>>,
    original_lengths: Vec<usize>,
    len: usize,
}

impl AlignedGroup {
    /// Experiment family name.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Shared parameter value.
    #[must_use]
    pub const fn value(&self) -> ParamValue {
        self.value
    }

    /// Common length `L` of every member.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the group spans zero days. Never true for reconciled groups.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of member runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Padded member series.
    #[must_use]
    pub fn runs(&self) -> &[Vec<DayRecord>] {
        &self.runs
    }

    /// Member lengths before padding.
    #[must_use]
    pub fn original_lengths(&self) -> &[usize] {
        &self.original_lengths
    }

    /// Every member's record at day index `index`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &DayRecord> + '_ {
        self.runs.iter().filter_map(move |run| run.get(index))
    }

    /// Index of the first member that was not padded.
    ///
    /// Its `day` values are the ones reported on the output axis.
    #[must_use]
    pub fn reference_member(&self) -> usize {
        self.original_lengths
            .iter()
            .position(|&l| l == self.len)
            .unwrap_or(0)
    }
}

/// Pad every member of `group` to the length of the longest one.
///
/// # Errors
///
/// Returns [`Error::EmptyRun`] if a member has no records. Groups built
/// through [`ExperimentGroup::new`] never do.
pub fn reconcile(group: &ExperimentGroup) -> Result<AlignedGroup> {
    let len = group.max_len();
    let runs = group
        .runs()
        .iter()
        .map(|run| {
            pad_to_length(run.records(), len).ok_or_else(|| Error::EmptyRun { path: run.origin() })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AlignedGroup {
        family: group.family().to_string(),
        value: group.value(),
        runs,
        original_lengths: group.lengths(),
        len,
    })
}
