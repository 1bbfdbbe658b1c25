//! Aggregated Series - cross-run statistics for one parameter configuration

use super::Summary;
use crate::record::Field;
use crate::run::ParamValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cross-run statistics for one day index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayAggregate {
    /// Day value reported by the unpadded reference run
    pub day: u64,
    /// Susceptible mean/std
    pub susceptible: Summary,
    /// Infected mean/std
    pub infected: Summary,
    /// Recovered mean/std
    pub recovered: Summary,
    /// Dead mean/std
    pub dead: Summary,
}

impl DayAggregate {
    /// Build from per-field summaries in [`Field::ALL`] order.
    #[must_use]
    pub const fn from_fields(day: u64, fields: [Summary; 4]) -> Self {
        let [susceptible, infected, recovered, dead] = fields;
        Self {
            day,
            susceptible,
            infected,
            recovered,
            dead,
        }
    }

    /// Summary of one tracked field.
    #[must_use]
    pub const fn get(&self, field: Field) -> Summary {
        match field {
            Field::Susceptible => self.susceptible,
            Field::Infected => self.infected,
            Field::Recovered => self.recovered,
            Field::Dead => self.dead,
        }
    }
}

/// Aggregated time series for one (experiment family, parameter value).
///
/// Run-length statistics use the pre-padding lengths, so they describe how
/// long the epidemics actually ran rather than the padded horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    family: String,
    parameter: ParamValue,
    run_count: usize,
    run_length_mean: f64,
    run_length_std: f64,
    per_day: Vec<DayAggregate>,
}

impl AggregatedSeries {
    /// Assemble a series from already-computed statistics.
    #[must_use]
    pub fn new(
        family: impl Into<String>,
        parameter: ParamValue,
        run_count: usize,
        run_length: Summary,
        per_day: Vec<DayAggregate>,
    ) -> Self {
        Self {
            family: family.into(),
            parameter,
            run_count,
            run_length_mean: run_length.mean,
            run_length_std: run_length.std,
            per_day,
        }
    }

    /// Experiment family name.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Swept parameter value.
    #[must_use]
    pub const fn parameter(&self) -> ParamValue {
        self.parameter
    }

    /// Number of runs aggregated.
    #[must_use]
    pub const fn run_count(&self) -> usize {
        self.run_count
    }

    /// Mean pre-padding run length in days.
    #[must_use]
    pub const fn run_length_mean(&self) -> f64 {
        self.run_length_mean
    }

    /// Population std of pre-padding run lengths.
    #[must_use]
    pub const fn run_length_std(&self) -> f64 {
        self.run_length_std
    }

    /// Per-day statistics, one entry per aligned day index.
    #[must_use]
    pub fn per_day(&self) -> &[DayAggregate] {
        &self.per_day
    }

    /// Statistics at day index `index`, if within the aligned length.
    #[must_use]
    pub fn day(&self, index: usize) -> Option<&DayAggregate> {
        self.per_day.get(index)
    }

    /// Aligned length `L`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.per_day.len()
    }

    /// Whether the series has no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_day.is_empty()
    }

    /// Day axis.
    #[must_use]
    pub fn days(&self) -> Vec<u64> {
        self.per_day.iter().map(|d| d.day).collect()
    }

    /// Per-day means of one field.
    #[must_use]
    pub fn means(&self, field: Field) -> Vec<f64> {
        self.per_day.iter().map(|d| d.get(field).mean).collect()
    }

    /// Per-day standard deviations of one field.
    #[must_use]
    pub fn stds(&self, field: Field) -> Vec<f64> {
        self.per_day.iter().map(|d| d.get(field).std).collect()
    }
}

impl fmt::Display for AggregatedSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} = {}: {} runs, run length {:.2} ± {:.2} days",
            self.family, self.parameter, self.run_count, self.run_length_mean, self.run_length_std
        )?;
        for day in &self.per_day {
            write!(f, "  day {:>4}", day.day)?;
            for field in Field::ALL {
                let s = day.get(field);
                write!(f, " | {} {:>10.3} ± {:<8.3}", field, s.mean, s.std)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
