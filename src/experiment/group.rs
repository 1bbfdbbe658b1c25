//! Experiment Group - runs sharing one (family, parameter value) pair

use crate::run::{ParamValue, RunSeries};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// All runs of one experiment family sharing one parameter value.
///
/// Invariant: at least one member, and every member has at least one day
/// record. Both are checked at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentGroup {
    family: String,
    value: ParamValue,
    runs: Vec<RunSeries>,
}

impl ExperimentGroup {
    /// Create a group, validating its members.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRun`] if any member has zero records
    /// - [`Error::InvalidInput`] if `runs` is empty or a member carries a
    ///   different parameter value
    pub fn new(family: impl Into<String>, value: ParamValue, runs: Vec<RunSeries>) -> Result<Self> {
        let family = family.into();
        if runs.is_empty() {
            return Err(Error::InvalidInput(format!(
                "experiment group {family}/{value} has no runs"
            )));
        }

        for run in &runs {
            if run.is_empty() {
                return Err(Error::EmptyRun { path: run.origin() });
            }
            if run.value() != value {
                return Err(Error::InvalidInput(format!(
                    "run {} has parameter value {}, expected {value}",
                    run.origin().display(),
                    run.value()
                )));
            }
        }

        Ok(Self {
            family,
            value,
            runs,
        })
    }

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

    /// Member runs in discovery order.
    #[must_use]
    pub fn runs(&self) -> &[RunSeries] {
        &self.runs
    }

    /// Number of member runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Pre-padding length of every member, in member order.
    #[must_use]
    pub fn lengths(&self) -> Vec<usize> {
        self.runs.iter().map(RunSeries::len).collect()
    }

    /// Length of the longest member.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.runs.iter().map(RunSeries::len).max().unwrap_or(0)
    }
}

/// Bucket the runs of one family by parameter value.
///
/// Values are compared with exact floating-point equality. Member order
/// within a group follows the order of `runs`.
///
/// # Errors
///
/// Returns [`Error::EmptyRun`] if any run has zero records.
pub fn group_runs(
    family: &str,
    runs: impl IntoIterator<Item = RunSeries>,
) -> Result<BTreeMap<ParamValue, ExperimentGroup>> {
    let mut buckets: BTreeMap<ParamValue, Vec<RunSeries>> = BTreeMap::new();
    for run in runs {
        buckets.entry(run.value()).or_default().push(run);
    }

    buckets
        .into_iter()
        .map(|(value, runs)| Ok((value, ExperimentGroup::new(family, value, runs)?)))
        .collect()
}
