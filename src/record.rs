//! Day records - one simulated day of population counts
//!
//! Raw run files carry one record per line:
//!
//! ```text
//! day susceptible infected recovered dead
//! 0 99 1 0 0
//! 1 97 3 0 0
//! ```
//!
//! Counts are widened to `f64` at parse time so cross-run means can be
//! fractional.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of whitespace-separated tokens on a data line.
pub const FIELDS_PER_LINE: usize = 5;

/// Tracked population state variable.
///
/// Each field is aggregated independently; no cross-field statistics exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Individuals who can still be infected
    Susceptible,
    /// Currently infectious individuals
    Infected,
    /// Individuals who recovered
    Recovered,
    /// Individuals who died
    Dead,
}

impl Field {
    /// All tracked fields in file column order.
    pub const ALL: [Self; 4] = [Self::Susceptible, Self::Infected, Self::Recovered, Self::Dead];

    /// Lower-case column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Susceptible => "susceptible",
            Self::Infected => "infected",
            Self::Recovered => "recovered",
            Self::Dead => "dead",
        }
    }

    /// Position of the field in [`Field::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Susceptible => 0,
            Self::Infected => 1,
            Self::Recovered => 2,
            Self::Dead => 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Population snapshot for a single simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Day index as reported by the simulation
    pub day: u64,
    /// Susceptible count
    pub susceptible: f64,
    /// Infected count
    pub infected: f64,
    /// Recovered count
    pub recovered: f64,
    /// Dead count
    pub dead: f64,
}

impl DayRecord {
    /// Create a record from already-widened counts.
    #[must_use]
    pub const fn new(day: u64, susceptible: f64, infected: f64, recovered: f64, dead: f64) -> Self {
        Self {
            day,
            susceptible,
            infected,
            recovered,
            dead,
        }
    }

    /// Value of one tracked field.
    #[must_use]
    pub const fn get(&self, field: Field) -> f64 {
        match field {
            Field::Susceptible => self.susceptible,
            Field::Infected => self.infected,
            Field::Recovered => self.recovered,
            Field::Dead => self.dead,
        }
    }

    /// Parse one line of raw run output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the line does not hold exactly
    /// [`FIELDS_PER_LINE`] tokens or a token is not a non-negative integer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sweep_aggregate::record::DayRecord;
    ///
    /// let record = DayRecord::parse_line("3 90 8 2 0")?;
    /// assert_eq!(record.day, 3);
    /// assert!((record.infected - 8.0).abs() < f64::EPSILON);
    /// # Ok::<(), sweep_aggregate::Error>(())
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn parse_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != FIELDS_PER_LINE {
            return Err(Error::Format(format!(
                "expected {FIELDS_PER_LINE} fields, found {} in {line:?}",
                tokens.len()
            )));
        }

        let mut values = [0_u64; FIELDS_PER_LINE];
        for (slot, token) in values.iter_mut().zip(&tokens) {
            *slot = token
                .parse()
                .map_err(|_| Error::Format(format!("non-integer token {token:?} in {line:?}")))?;
        }

        let [day, susceptible, infected, recovered, dead] = values;
        Ok(Self::new(
            day,
            susceptible as f64,
            infected as f64,
            recovered as f64,
            dead as f64,
        ))
    }
}
