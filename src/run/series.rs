//! Run Series - the ordered day records of one simulation run

use super::ParamValue;
use crate::record::DayRecord;
use std::path::{Path, PathBuf};

/// Ordered day records of a single simulation run.
///
/// Tagged with the experiment family it was discovered under and the
/// parameter value decoded from its filename. Never mutated after loading;
/// reconciliation produces padded copies.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSeries {
    family: String,
    prefix: String,
    value: ParamValue,
    run_index: Option<u32>,
    source: Option<PathBuf>,
    records: Vec<DayRecord>,
}

impl RunSeries {
    /// Create an in-memory run with no filename metadata.
    #[must_use]
    pub fn new(family: impl Into<String>, value: ParamValue, records: Vec<DayRecord>) -> Self {
        Self::builder(family, value).records(records).build()
    }

    /// Create a builder for constructing a run with optional fields.
    #[must_use]
    pub fn builder(family: impl Into<String>, value: ParamValue) -> RunSeriesBuilder {
        RunSeriesBuilder::new(family, value)
    }

    /// Experiment family (directory name), e.g. `transmission`.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Filename prefix, e.g. `tra`. Empty for in-memory runs.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Swept parameter value.
    #[must_use]
    pub const fn value(&self) -> ParamValue {
        self.value
    }

    /// Run index from the filename, if present.
    #[must_use]
    pub const fn run_index(&self) -> Option<u32> {
        self.run_index
    }

    /// File this run was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Path used to identify the run in error messages.
    #[must_use]
    pub fn origin(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(|| {
            let run = self.run_index.map_or_else(String::new, |i| format!("_run{i}"));
            PathBuf::from(&self.family).join(format!("{}{}{run}", self.prefix, self.value))
        })
    }

    /// Day records in file order.
    #[must_use]
    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    /// Number of reported days (pre-padding length).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the run reported no days at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Last reported day, the terminal state used for padding.
    #[must_use]
    pub fn last(&self) -> Option<&DayRecord> {
        self.records.last()
    }
}

/// Builder for `RunSeries`.
#[derive(Debug)]
pub struct RunSeriesBuilder {
    family: String,
    prefix: String,
    value: ParamValue,
    run_index: Option<u32>,
    source: Option<PathBuf>,
    records: Vec<DayRecord>,
}

impl RunSeriesBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(family: impl Into<String>, value: ParamValue) -> Self {
        Self {
            family: family.into(),
            prefix: String::new(),
            value,
            run_index: None,
            source: None,
            records: Vec::new(),
        }
    }

    /// Set the filename prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the run index.
    #[must_use]
    pub const fn run_index(mut self, run_index: Option<u32>) -> Self {
        self.run_index = run_index;
        self
    }

    /// Set the source file.
    #[must_use]
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the day records.
    #[must_use]
    pub fn records(mut self, records: Vec<DayRecord>) -> Self {
        self.records = records;
        self
    }

    /// Build the `RunSeries`.
    #[must_use]
    pub fn build(self) -> RunSeries {
        RunSeries {
            family: self.family,
            prefix: self.prefix,
            value: self.value,
            run_index: self.run_index,
            source: self.source,
            records: self.records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_origin() {
        let value = ParamValue::new(0.1).unwrap();
        let run = RunSeries::builder("transmission", value)
            .prefix("tra")
            .run_index(Some(2))
            .build();
        assert!(run.is_empty());
        assert_eq!(run.origin(), PathBuf::from("transmission/tra0.1_run2"));
    }

    #[test]
    fn test_source_origin() {
        let value = ParamValue::new(3.0).unwrap();
        let run = RunSeries::builder("period", value)
            .source("/data/period/per3_run0.txt")
            .records(vec![DayRecord::new(0, 10.0, 0.0, 0.0, 0.0)])
            .build();
        assert_eq!(run.len(), 1);
        assert_eq!(run.origin(), PathBuf::from("/data/period/per3_run0.txt"));
        assert_eq!(run.last().map(|r| r.day), Some(0));
    }
}
