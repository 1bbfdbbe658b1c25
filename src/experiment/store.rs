//! Aggregate Store - experiment family → parameter value → aggregated series
//!
//! This is the artifact handed to the rendering layer. Parameter values are
//! floats, so the JSON form stores each family as a list of series (each
//! carrying its own `parameter`) rather than a float-keyed object.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedSeries;
use crate::run::ParamValue;
use crate::{Error, Result};

/// Aggregated series of one experiment family, keyed by parameter value.
///
/// Deserialising rejects a list that repeats a parameter value or mixes
/// families.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AggregatedSeries>", into = "Vec<AggregatedSeries>")]
pub struct FamilyAggregates(BTreeMap<ParamValue, AggregatedSeries>);

impl FamilyAggregates {
    /// Series for one parameter value.
    #[must_use]
    pub fn get(&self, value: ParamValue) -> Option<&AggregatedSeries> {
        self.0.get(&value)
    }

    /// Parameter values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = ParamValue> + '_ {
        self.0.keys().copied()
    }

    /// `(value, series)` pairs in ascending value order.
    pub fn iter(&self) -> btree_map::Iter<'_, ParamValue, AggregatedSeries> {
        self.0.iter()
    }

    /// Number of parameter values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the family holds no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, series: AggregatedSeries) -> Option<AggregatedSeries> {
        self.0.insert(series.parameter(), series)
    }
}

impl TryFrom<Vec<AggregatedSeries>> for FamilyAggregates {
    type Error = Error;

    fn try_from(series: Vec<AggregatedSeries>) -> Result<Self> {
        let mut family = Self::default();
        let mut name: Option<String> = None;
        for s in series {
            let name = name.get_or_insert_with(|| s.family().to_string());
            if name != s.family() {
                return Err(Error::InvalidInput(format!(
                    "series {}/{} listed under family {name}",
                    s.family(),
                    s.parameter()
                )));
            }

            let key = format!("{}/{}", s.family(), s.parameter());
            if family.insert(s).is_some() {
                return Err(Error::InvalidInput(format!("duplicate series {key}")));
            }
        }
        Ok(family)
    }
}

impl From<FamilyAggregates> for Vec<AggregatedSeries> {
    fn from(family: FamilyAggregates) -> Self {
        family.0.into_values().collect()
    }
}

impl FromIterator<AggregatedSeries> for FamilyAggregates {
    fn from_iter<I: IntoIterator<Item = AggregatedSeries>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.parameter(), s)).collect())
    }
}

impl<'a> IntoIterator for &'a FamilyAggregates {
    type Item = (&'a ParamValue, &'a AggregatedSeries);
    type IntoIter = btree_map::Iter<'a, ParamValue, AggregatedSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Serialized form of [`AggregateStore`], checked on the way in.
#[derive(Deserialize)]
struct StoreRepr {
    created_at: DateTime<Utc>,
    families: BTreeMap<String, FamilyAggregates>,
}

impl TryFrom<StoreRepr> for AggregateStore {
    type Error = Error;

    fn try_from(repr: StoreRepr) -> Result<Self> {
        for (name, family) in &repr.families {
            if let Some((_, series)) = family.iter().find(|(_, s)| s.family() != name) {
                return Err(Error::InvalidInput(format!(
                    "series {}/{} stored under family {name}",
                    series.family(),
                    series.parameter()
                )));
            }
        }
        Ok(Self {
            created_at: repr.created_at,
            families: repr.families,
        })
    }
}

/// Two-level store of aggregated series.
///
/// ## Design
///
/// Built once per aggregation pass and read-only for consumers. Lookups
/// return `Option`: a (family, value) pair either has a series or is absent.
/// Iteration happens to be ordered (family name, then ascending value), but
/// consumers must not rely on discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreRepr")]
pub struct AggregateStore {
    created_at: DateTime<Utc>,
    families: BTreeMap<String, FamilyAggregates>,
}

impl Default for AggregateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateStore {
    /// Create a new empty store stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            families: BTreeMap::new(),
        }
    }

    /// When this store was assembled.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if the store holds no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.values().all(FamilyAggregates::is_empty)
    }

    /// Number of experiment families.
    #[must_use]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Total number of aggregated series across families.
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.families.values().map(FamilyAggregates::len).sum()
    }

    /// Add a series under its own family and parameter value.
    ///
    /// Returns the series it replaced, if any.
    pub fn insert(&mut self, series: AggregatedSeries) -> Option<AggregatedSeries> {
        self.families
            .entry(series.family().to_string())
            .or_default()
            .insert(series)
    }

    /// Add (or replace) a whole family.
    pub fn insert_family(&mut self, family: impl Into<String>, aggregates: FamilyAggregates) {
        self.families.insert(family.into(), aggregates);
    }

    /// Family names in ascending order.
    pub fn families(&self) -> impl Iterator<Item = &str> + '_ {
        self.families.keys().map(String::as_str)
    }

    /// All series of one family.
    #[must_use]
    pub fn family(&self, family: &str) -> Option<&FamilyAggregates> {
        self.families.get(family)
    }

    /// Series for one (family, parameter value).
    ///
    /// ```rust
    /// use sweep_aggregate::experiment::AggregateStore;
    /// use sweep_aggregate::run::ParamValue;
    ///
    /// let store = AggregateStore::new();
    /// let value = ParamValue::new(0.3)?;
    /// assert!(store.get("transmission", value).is_none());
    /// # Ok::<(), sweep_aggregate::Error>(())
    /// ```
    #[must_use]
    pub fn get(&self, family: &str, value: ParamValue) -> Option<&AggregatedSeries> {
        self.families.get(family)?.get(value)
    }

    /// Every series, family by family.
    pub fn series(&self) -> impl Iterator<Item = &AggregatedSeries> + '_ {
        self.families
            .values()
            .flat_map(|family| family.iter().map(|(_, series)| series))
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if
    /// encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a store from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) for
    /// malformed JSON, non-finite parameter values, a parameter value listed
    /// twice in one family, or a series filed under another family.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the store as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if encoding or writing fails.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a store previously written with [`write_json`](Self::write_json).
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl fmt::Display for AggregateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, family) in &self.families {
            writeln!(f, "{name}")?;
            for (_, series) in family {
                write!(f, "{series}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
