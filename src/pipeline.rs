//! Aggregation pipeline: load → group → reconcile → aggregate
//!
//! One pass per experiment family directory. All inputs are explicit
//! parameters or builder settings; nothing is read from process-wide state.

use crate::aggregate::{aggregate_group, AggregatedSeries};
use crate::experiment::{group_runs, AggregateStore, ExperimentGroup, FamilyAggregates};
use crate::run::{RunLoader, RunSeries, DEFAULT_EXTENSION};
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Experiment families swept by the original simulation study.
pub const DEFAULT_FAMILIES: [&str; 3] = ["transmission", "period", "mortality"];

/// Configured aggregation pipeline.
///
/// ```rust,no_run
/// use sweep_aggregate::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .families(["transmission", "mortality"])
///     .extension("txt")
///     .build()?;
/// let store = pipeline.run("analysis/data")?;
/// println!("{} series", store.series_count());
/// # Ok::<(), sweep_aggregate::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: RunLoader,
    families: Vec<String>,
    parallel: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            loader: RunLoader::default(),
            families: Vec::new(),
            parallel: cfg!(feature = "rayon"),
        }
    }
}

impl Pipeline {
    /// Create a new pipeline builder
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Configured families. Empty means "every subdirectory of the root".
    #[must_use]
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Recognised data-file extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.loader.extension()
    }

    /// Whether groups are reduced in parallel.
    #[must_use]
    pub const fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Aggregate every configured (or discovered) family under `root`.
    ///
    /// # Errors
    ///
    /// Fails on the first family that fails; no partial store is returned.
    pub fn run(&self, root: impl AsRef<Path>) -> Result<AggregateStore> {
        let root = root.as_ref();
        let families = if self.families.is_empty() {
            discover_families(root)?
        } else {
            self.families.clone()
        };

        let mut store = AggregateStore::new();
        for family in &families {
            let aggregates = self.aggregate_family(&root.join(family), family)?;
            store.insert_family(family.as_str(), aggregates);
        }

        info!(
            root = %root.display(),
            families = store.family_count(),
            series = store.series_count(),
            "aggregation complete"
        );
        Ok(store)
    }

    /// Aggregate one family directory.
    ///
    /// # Errors
    ///
    /// Returns the first load, grouping or aggregation error.
    pub fn aggregate_family(&self, dir: &Path, family: &str) -> Result<FamilyAggregates> {
        let runs = self.loader.load_dir(dir, family)?;
        debug!(family, dir = %dir.display(), runs = runs.len(), "loaded family");
        self.aggregate_runs(family, runs)
    }

    /// Group and aggregate already-loaded runs of one family.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRun`] for a zero-length run, or any
    /// aggregation error.
    pub fn aggregate_runs(&self, family: &str, runs: Vec<RunSeries>) -> Result<FamilyAggregates> {
        let run_count = runs.len();
        let groups: Vec<ExperimentGroup> = group_runs(family, runs)?.into_values().collect();
        let series = self.reduce(&groups)?;

        info!(family, groups = series.len(), runs = run_count, "aggregated family");
        Ok(series.into_iter().collect())
    }

    fn reduce(&self, groups: &[ExperimentGroup]) -> Result<Vec<AggregatedSeries>> {
        #[cfg(feature = "rayon")]
        {
            if self.parallel {
                use rayon::prelude::*;
                return groups.par_iter().map(aggregate_group).collect();
            }
        }
        groups.iter().map(aggregate_group).collect()
    }
}

/// Names of every non-hidden subdirectory of `root`, sorted.
///
/// # Errors
///
/// Returns [`Error::Io`] if `root` cannot be listed.
pub fn discover_families(root: &Path) -> Result<Vec<String>> {
    let mut families = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            match entry.file_name().to_str() {
                Some(name) if !name.starts_with('.') => families.push(name.to_string()),
                _ => {}
            }
        }
    }
    families.sort();
    Ok(families)
}

/// Pipeline builder
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    extension: String,
    families: Vec<String>,
    parallel: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            families: Vec::new(),
            parallel: cfg!(feature = "rayon"),
        }
    }
}

impl PipelineBuilder {
    /// Add one experiment family (a subdirectory name under the root)
    #[must_use]
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    /// Add several experiment families
    #[must_use]
    pub fn families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families.extend(families.into_iter().map(Into::into));
        self
    }

    /// Set the data-file extension (default `txt`)
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Reduce groups in parallel. Ignored without the `rayon` feature.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the pipeline
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty extension, or a family
    /// name that is blank, repeated, or not a plain directory name.
    pub fn build(self) -> Result<Pipeline> {
        let extension = self.extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(Error::InvalidInput(
                "data-file extension must not be empty".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for family in &self.families {
            if family.trim().is_empty()
                || family.contains(['/', '\\'])
                || family == "."
                || family == ".."
            {
                return Err(Error::InvalidInput(format!(
                    "invalid experiment family name {family:?}"
                )));
            }
            if !seen.insert(family.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "experiment family {family:?} listed twice"
                )));
            }
        }

        Ok(Pipeline {
            loader: RunLoader::new(extension),
            families: self.families,
            parallel: self.parallel && cfg!(feature = "rayon"),
        })
    }
}
