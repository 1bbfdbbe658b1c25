//! Run Loader - reads run files into `RunSeries`

use super::{RunFileName, RunSeries};
use crate::record::DayRecord;
use crate::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default data-file extension written by the simulator.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Loads run files with a recognised data extension.
///
/// Files with any other extension are skipped, so result directories may
/// also hold logs, plots or notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLoader {
    extension: String,
}

impl Default for RunLoader {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl RunLoader {
    /// Create a loader for the given extension (a leading `.` is ignored).
    #[must_use]
    pub fn new(extension: impl AsRef<str>) -> Self {
        Self {
            extension: extension.as_ref().trim_start_matches('.').to_string(),
        }
    }

    /// Recognised data-file extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether `path` carries the recognised extension.
    #[must_use]
    pub fn is_data_file(&self, path: &Path) -> bool {
        path.extension().and_then(OsStr::to_str) == Some(self.extension.as_str())
    }

    /// Load one run file.
    ///
    /// Returns `Ok(None)` when the file does not carry the data extension.
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] for a malformed filename, a malformed line,
    ///   non-contiguous day indices, or a file that cannot be read as text
    /// - [`Error::EmptyRun`] if the file holds no records
    pub fn load(&self, path: &Path, family: &str) -> Result<Option<RunSeries>> {
        if !self.is_data_file(path) {
            debug!(path = %path.display(), "skipping non-data file");
            return Ok(None);
        }

        let stem = path
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::format_in(path, "filename is not valid UTF-8"))?;
        let name = RunFileName::parse(stem).map_err(|e| e.in_file(path))?;

        let contents = fs::read_to_string(path)
            .map_err(|e| Error::format_in(path, format!("unreadable: {e}")))?;
        let records = parse_records(path, &contents)?;
        if records.is_empty() {
            return Err(Error::EmptyRun {
                path: path.to_path_buf(),
            });
        }

        debug!(
            path = %path.display(),
            family,
            value = %name.value(),
            days = records.len(),
            "loaded run"
        );

        Ok(Some(
            RunSeries::builder(family, name.value())
                .prefix(name.prefix())
                .run_index(name.run_index())
                .source(path)
                .records(records)
                .build(),
        ))
    }

    /// Load every data file directly under `dir`, in filename order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that fails to load; no partial result is
    /// returned.
    pub fn load_dir(&self, dir: &Path, family: &str) -> Result<Vec<RunSeries>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| {
                Error::Io(std::io::Error::new(e.kind(), format!("{}: {e}", dir.display())))
            })?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.retain(|p| p.is_file());
        paths.sort();

        let mut runs = Vec::with_capacity(paths.len());
        for path in &paths {
            if let Some(run) = self.load(path, family)? {
                runs.push(run);
            }
        }
        Ok(runs)
    }
}

/// Parse file contents into day records, enforcing contiguous day indices.
fn parse_records(path: &Path, contents: &str) -> Result<Vec<DayRecord>> {
    let mut records: Vec<DayRecord> = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let record = DayRecord::parse_line(line).map_err(|e| match e {
            Error::Format(detail) => {
                Error::format_in(path, format!("line {}: {detail}", line_no + 1))
            }
            other => other,
        })?;

        if let Some(prev) = records.last() {
            if prev.day.checked_add(1) != Some(record.day) {
                return Err(Error::format_in(
                    path,
                    format!(
                        "line {}: day {} does not follow day {}",
                        line_no + 1,
                        record.day,
                        prev.day
                    ),
                ));
            }
        }
        records.push(record);
    }
    Ok(records)
}
