//! Columnar export of aggregated series (Arrow/Parquet)
//!
//! Each [`AggregatedSeries`] becomes one Arrow `RecordBatch`:
//!
//! ```text
//! day: UInt64 | susceptible_mean | susceptible_std | infected_mean | ... | dead_std   (Float64)
//! ```
//!
//! Group-level values (family, parameter, run count, run-length mean/std)
//! travel in the schema metadata, so one Parquet file holds one series.
//! [`export_store`] lays files out as `<dir>/<family>/<parameter>.parquet`.

use crate::aggregate::{AggregatedSeries, DayAggregate, Summary};
use crate::experiment::AggregateStore;
use crate::record::Field as TrackedField;
use crate::run::ParamValue;
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Schema metadata key: experiment family
pub const META_FAMILY: &str = "sweep.family";
/// Schema metadata key: parameter value
pub const META_PARAMETER: &str = "sweep.parameter";
/// Schema metadata key: number of runs
pub const META_RUN_COUNT: &str = "sweep.run_count";
/// Schema metadata key: mean pre-padding run length
pub const META_RUN_LENGTH_MEAN: &str = "sweep.run_length_mean";
/// Schema metadata key: population std of pre-padding run lengths
pub const META_RUN_LENGTH_STD: &str = "sweep.run_length_std";

/// Column name of the day axis
pub const DAY_COLUMN: &str = "day";

fn mean_column(field: TrackedField) -> String {
    format!("{}_mean", field.name())
}

fn std_column(field: TrackedField) -> String {
    format!("{}_std", field.name())
}

/// Arrow schema for an aggregated series, with the given metadata attached.
#[must_use]
pub fn series_schema(metadata: HashMap<String, String>) -> Schema {
    let mut fields = vec![Field::new(DAY_COLUMN, DataType::UInt64, false)];
    for field in TrackedField::ALL {
        fields.push(Field::new(mean_column(field), DataType::Float64, false));
        fields.push(Field::new(std_column(field), DataType::Float64, false));
    }
    Schema::new_with_metadata(fields, metadata)
}

/// Convert a series to a record batch.
///
/// # Errors
///
/// Returns [`Error::Arrow`] if the batch cannot be assembled.
pub fn to_record_batch(series: &AggregatedSeries) -> Result<RecordBatch> {
    let metadata = HashMap::from([
        (META_FAMILY.to_string(), series.family().to_string()),
        (META_PARAMETER.to_string(), series.parameter().to_string()),
        (META_RUN_COUNT.to_string(), series.run_count().to_string()),
        (
            META_RUN_LENGTH_MEAN.to_string(),
            series.run_length_mean().to_string(),
        ),
        (
            META_RUN_LENGTH_STD.to_string(),
            series.run_length_std().to_string(),
        ),
    ]);

    let mut columns: Vec<ArrayRef> = vec![Arc::new(UInt64Array::from(series.days()))];
    for field in TrackedField::ALL {
        columns.push(Arc::new(Float64Array::from(series.means(field))));
        columns.push(Arc::new(Float64Array::from(series.stds(field))));
    }

    Ok(RecordBatch::try_new(
        Arc::new(series_schema(metadata)),
        columns,
    )?)
}

fn metadata_value<T: FromStr>(metadata: &HashMap<String, String>, key: &str) -> Result<T> {
    let raw = metadata
        .get(key)
        .ok_or_else(|| Error::StorageError(format!("Missing schema metadata {key:?}")))?;
    raw.parse()
        .map_err(|_| Error::StorageError(format!("Invalid schema metadata {key:?}: {raw:?}")))
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| Error::StorageError(format!("Column not found: {name}")))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::StorageError(format!("Unexpected data type for column {name}")))
}

/// Rebuild a series from record batches produced by [`to_record_batch`].
///
/// Rows are taken from the batches in order; metadata comes from `schema`.
///
/// # Errors
///
/// Returns [`Error::StorageError`] for missing columns or metadata.
pub fn from_record_batches(schema: &Schema, batches: &[RecordBatch]) -> Result<AggregatedSeries> {
    let metadata = schema.metadata();
    let family: String = metadata_value(metadata, META_FAMILY)?;
    let parameter: f64 = metadata_value(metadata, META_PARAMETER)?;
    let parameter = ParamValue::new(parameter)?;
    let run_length = Summary {
        mean: metadata_value(metadata, META_RUN_LENGTH_MEAN)?,
        std: metadata_value(metadata, META_RUN_LENGTH_STD)?,
    };

    let mut per_day = Vec::new();
    for batch in batches {
        let days = column::<UInt64Array>(batch, DAY_COLUMN)?;
        let mut stats = Vec::with_capacity(TrackedField::ALL.len());
        for field in TrackedField::ALL {
            stats.push((
                column::<Float64Array>(batch, &mean_column(field))?,
                column::<Float64Array>(batch, &std_column(field))?,
            ));
        }

        for row in 0..batch.num_rows() {
            let mut fields = [Summary::default(); 4];
            for (slot, (means, stds)) in fields.iter_mut().zip(&stats) {
                *slot = Summary {
                    mean: means.value(row),
                    std: stds.value(row),
                };
            }
            per_day.push(DayAggregate::from_fields(days.value(row), fields));
        }
    }

    Ok(AggregatedSeries::new(
        family,
        parameter,
        metadata_value(metadata, META_RUN_COUNT)?,
        run_length,
        per_day,
    ))
}

/// Write one series to a Parquet file.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn write_parquet<P: AsRef<Path>>(series: &AggregatedSeries, path: P) -> Result<()> {
    use parquet::arrow::ArrowWriter;

    let batch = to_record_batch(series)?;
    let file = File::create(path.as_ref()).map_err(|e| {
        Error::StorageError(format!(
            "Failed to create Parquet file {}: {e}",
            path.as_ref().display()
        ))
    })?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read a series written with [`write_parquet`].
///
/// # Errors
///
/// Returns error if the file cannot be read or does not hold a series.
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<AggregatedSeries> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = File::open(path.as_ref())
        .map_err(|e| Error::StorageError(format!("Failed to open Parquet file: {e}")))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::StorageError(format!("Failed to parse Parquet file: {e}")))?;
    let schema = builder.schema().clone();

    let reader = builder
        .build()
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet reader: {e}")))?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch = batch
            .map_err(|e| Error::StorageError(format!("Failed to read record batch: {e}")))?;
        batches.push(batch);
    }

    from_record_batches(&schema, &batches)
}

/// Write every series of `store` under `dir` as `<family>/<parameter>.parquet`.
///
/// Returns the written paths in store order.
///
/// # Errors
///
/// Returns error on the first directory or file that cannot be written.
pub fn export_store<P: AsRef<Path>>(store: &AggregateStore, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::with_capacity(store.series_count());
    for series in store.series() {
        let family_dir = dir.join(series.family());
        fs::create_dir_all(&family_dir)?;

        let path = family_dir.join(format!("{}.parquet", series.parameter()));
        write_parquet(series, &path)?;
        debug!(path = %path.display(), days = series.len(), "wrote parquet");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AggregatedSeries {
        let per_day = (0..3_u32)
            .map(|d| {
                let d_f = f64::from(d);
                DayAggregate::from_fields(
                    u64::from(d),
                    [
                        Summary { mean: 100.0 - d_f, std: 0.5 * d_f },
                        Summary { mean: d_f, std: 0.25 },
                        Summary { mean: 0.0, std: 0.0 },
                        Summary { mean: 0.1 * d_f, std: 0.0 },
                    ],
                )
            })
            .collect();
        AggregatedSeries::new(
            "transmission",
            ParamValue::new(0.3).unwrap(),
            4,
            Summary { mean: 17.0 / 3.0, std: 0.942_809_041_582_063_4 },
            per_day,
        )
    }

    #[test]
    fn test_schema_columns() {
        let schema = series_schema(HashMap::new());
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names[0], "day");
        assert_eq!(names[1], "susceptible_mean");
        assert_eq!(names[8], "dead_std");
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_record_batch_shape() {
        let batch = to_record_batch(&sample()).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 9);
        assert_eq!(batch.schema().metadata()[META_FAMILY], "transmission");
        assert_eq!(batch.schema().metadata()[META_RUN_COUNT], "4");
    }

    #[test]
    fn test_from_record_batches_restores_series() {
        let series = sample();
        let batch = to_record_batch(&series).unwrap();
        let schema = batch.schema();
        let back = from_record_batches(&schema, &[batch]).unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn test_missing_metadata() {
        let batch = to_record_batch(&sample()).unwrap();
        let bare = series_schema(HashMap::new());
        let err = from_record_batches(&bare, &[batch]).unwrap_err();
        assert!(err.to_string().contains("sweep.family"));
    }
}
