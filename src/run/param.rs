//! Param Value - the swept scalar shared by the runs of one group

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Swept parameter value (transmission rate, infectious period, ...).
///
/// Always finite, with negative zero normalised to zero, so equality is
/// exact floating-point equality and agrees with `Hash` and `Ord`. No
/// tolerance is applied: values come from a fixed sweep and parse
/// identically across runs of the same configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ParamValue(f64);

impl ParamValue {
    /// Wrap a finite parameter value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for NaN or infinite values.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "parameter value must be finite, got {value}"
            )));
        }
        Ok(Self(value + 0.0))
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for ParamValue {}

impl Hash for ParamValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for ParamValue {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ParamValue> for f64 {
    fn from(value: ParamValue) -> Self {
        value.0
    }
}

impl FromStr for ParamValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<f64>()
            .ok()
            .and_then(|v| Self::new(v).ok())
            .ok_or_else(|| Error::Format(format!("parameter segment {s:?} is not a finite number")))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
