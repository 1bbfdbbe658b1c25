//! Run filename convention: `<prefix><value>_run<index>.<ext>`

use super::ParamValue;
use crate::{Error, Result};

/// Number of leading characters naming the experiment family (`tra`, `per`, `mor`).
pub const PREFIX_LEN: usize = 3;

/// Components decoded from a run file stem such as `tra0.30_run4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFileName {
    prefix: String,
    value: ParamValue,
    run_index: Option<u32>,
}

impl RunFileName {
    /// Decode a file stem (the filename without its extension).
    ///
    /// The parameter segment is everything before the first `_` minus the
    /// [`PREFIX_LEN`]-character prefix. The run index is optional: it is
    /// recorded when the remainder reads `run<index>` and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the stem has no parameter segment or the
    /// segment is not a finite number.
    pub fn parse(stem: &str) -> Result<Self> {
        let (head, tail) = match stem.split_once('_') {
            Some((head, tail)) => (head, Some(tail)),
            None => (stem, None),
        };

        let split = head
            .char_indices()
            .nth(PREFIX_LEN)
            .map(|(i, _)| i)
            .ok_or_else(|| {
                Error::Format(format!(
                    "filename {stem:?} has no parameter segment after the {PREFIX_LEN}-character prefix"
                ))
            })?;
        let (prefix, raw_value) = head.split_at(split);

        let run_index = tail
            .and_then(|t| t.strip_prefix("run"))
            .and_then(|i| i.parse().ok());

        Ok(Self {
            prefix: prefix.to_string(),
            value: raw_value.parse()?,
            run_index,
        })
    }

    /// Experiment prefix, e.g. `tra`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parsed parameter value.
    #[must_use]
    pub const fn value(&self) -> ParamValue {
        self.value
    }

    /// Run index, when the stem carries a well-formed `_run<index>` suffix.
    #[must_use]
    pub const fn run_index(&self) -> Option<u32> {
        self.run_index
    }
}
