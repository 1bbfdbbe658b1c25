//! Integration test for the full aggregation pipeline
//!
//! Tests the complete path:
//! 1. Write run files for several families into a data root
//! 2. Load, group, reconcile and aggregate
//! 3. Query the aggregate store

use std::fs;
use std::path::Path;
use sweep_aggregate::pipeline::discover_families;
use sweep_aggregate::record::Field;
use sweep_aggregate::run::ParamValue;
use sweep_aggregate::{Error, Pipeline};
use tempfile::TempDir;

fn write_run(root: &Path, family: &str, name: &str, rows: &[[u64; 5]]) {
    let dir = root.join(family);
    fs::create_dir_all(&dir).unwrap();
    let contents: String = rows
        .iter()
        .map(|r| format!("{} {} {} {} {}\n", r[0], r[1], r[2], r[3], r[4]))
        .collect();
    fs::write(dir.join(name), contents).unwrap();
}

fn value(v: f64) -> ParamValue {
    ParamValue::new(v).unwrap()
}

/// Data root with two transmission rates and one infectious period.
fn sample_root() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();

    // tra0.10: three runs of lengths 5, 5, 7
    for run in 0..2 {
        write_run(
            r,
            "transmission",
            &format!("tra0.10_run{run}.txt"),
            &[
                [0, 100, 0, 0, 0],
                [1, 98, 2, 0, 0],
                [2, 96, 3, 1, 0],
                [3, 96, 1, 3, 0],
                [4, 96, 0, 4, 0],
            ],
        );
    }
    write_run(
        r,
        "transmission",
        "tra0.10_run2.txt",
        &[
            [0, 100, 0, 0, 0],
            [1, 97, 3, 0, 0],
            [2, 94, 5, 1, 0],
            [3, 92, 4, 3, 1],
            [4, 91, 2, 6, 1],
            [5, 91, 1, 7, 1],
            [6, 91, 0, 8, 1],
        ],
    );

    // tra0.20: two single-day runs
    write_run(r, "transmission", "tra0.20_run0.txt", &[[0, 100, 0, 0, 0]]);
    write_run(r, "transmission", "tra0.20_run1.txt", &[[0, 90, 10, 0, 0]]);

    // period 3: one run, plus a stray plot that must be ignored
    write_run(r, "period", "per3_run0.txt", &[[0, 50, 5, 0, 0], [1, 45, 8, 2, 0]]);
    fs::write(r.join("period").join("per3_run0.png"), b"\x89PNG").unwrap();

    root
}

#[test]
fn test_pipeline_aggregates_every_family() {
    let root = sample_root();
    let store = Pipeline::builder()
        .families(["transmission", "period"])
        .build()
        .unwrap()
        .run(root.path())
        .unwrap();

    assert_eq!(store.family_count(), 2);
    assert_eq!(store.series_count(), 3);

    let low = store.get("transmission", value(0.1)).unwrap();
    assert_eq!(low.run_count(), 3);
    assert_eq!(low.len(), 7);
    assert!((low.run_length_mean() - 17.0 / 3.0).abs() < 1e-12);
    assert!(low.run_length_std() > 0.0);
    assert_eq!(low.days(), vec![0, 1, 2, 3, 4, 5, 6]);

    // Day 6: two runs held at (96, 0, 4, 0), one at (91, 0, 8, 1)
    let day6 = low.day(6).unwrap();
    assert!((day6.susceptible.mean - (96.0 * 2.0 + 91.0) / 3.0).abs() < 1e-12);
    assert_eq!(day6.infected.mean, 0.0);
    assert_eq!(day6.infected.std, 0.0);
}

#[test]
fn test_two_runs_mean_and_std() {
    let root = sample_root();
    let store = Pipeline::builder()
        .family("transmission")
        .build()
        .unwrap()
        .run(root.path())
        .unwrap();

    let high = store.get("transmission", value(0.2)).unwrap();
    let day0 = high.day(0).unwrap();
    assert_eq!(day0.susceptible.mean, 95.0);
    assert_eq!(day0.susceptible.std, 5.0);
    assert_eq!(high.means(Field::Infected), vec![5.0]);
}

#[test]
fn test_single_run_group_is_identity() {
    let root = sample_root();
    let store = Pipeline::builder()
        .family("period")
        .parallel(false)
        .build()
        .unwrap()
        .run(root.path())
        .unwrap();

    let series = store.get("period", value(3.0)).unwrap();
    assert_eq!(series.means(Field::Infected), vec![5.0, 8.0]);
    assert_eq!(series.stds(Field::Infected), vec![0.0, 0.0]);
    assert_eq!(series.run_length_std(), 0.0);
}

#[test]
fn test_parallel_matches_sequential() {
    let root = sample_root();
    let run = |parallel| {
        Pipeline::builder()
            .families(["transmission", "period"])
            .parallel(parallel)
            .build()
            .unwrap()
            .run(root.path())
            .unwrap()
    };

    let a = run(true);
    let b = run(false);
    assert_eq!(a.series().cloned().collect::<Vec<_>>(), b.series().cloned().collect::<Vec<_>>());
}

#[test]
fn test_discovers_families_when_unconfigured() {
    let root = sample_root();
    fs::create_dir(root.path().join(".cache")).unwrap();

    assert_eq!(
        discover_families(root.path()).unwrap(),
        vec!["period".to_string(), "transmission".to_string()]
    );

    let store = Pipeline::builder().build().unwrap().run(root.path()).unwrap();
    let families: Vec<&str> = store.families().collect();
    assert_eq!(families, vec!["period", "transmission"]);
}

#[test]
fn test_malformed_line_aborts_pass() {
    let root = sample_root();
    write_run(root.path(), "period", "per4_run0.txt", &[[0, 50, 5, 0, 0]]);
    fs::write(
        root.path().join("period").join("per4_run1.txt"),
        "0 50 5 0\n",
    )
    .unwrap();

    let err = Pipeline::builder()
        .family("period")
        .build()
        .unwrap()
        .run(root.path())
        .unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("per4_run1.txt"));
}

#[test]
fn test_non_utf8_run_file_is_format_error() {
    let root = sample_root();
    fs::write(
        root.path().join("period").join("per3_run1.txt"),
        b"0 50 5 0 0\n1 4\xff 8 2 0\n",
    )
    .unwrap();

    let err = Pipeline::builder()
        .family("period")
        .build()
        .unwrap()
        .run(root.path())
        .unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("per3_run1.txt"));
}

#[test]
fn test_non_numeric_parameter_aborts_pass() {
    let root = sample_root();
    write_run(root.path(), "mortality", "morX_run0.txt", &[[0, 50, 5, 0, 0]]);

    let err = Pipeline::builder()
        .family("mortality")
        .build()
        .unwrap()
        .run(root.path())
        .unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_empty_run_aborts_pass() {
    let root = sample_root();
    fs::write(root.path().join("transmission").join("tra0.10_run3.txt"), "").unwrap();

    let err = Pipeline::builder()
        .family("transmission")
        .build()
        .unwrap()
        .run(root.path())
        .unwrap_err();
    assert!(err.is_empty_run());
}

#[test]
fn test_missing_family_directory() {
    let root = sample_root();
    let err = Pipeline::builder()
        .family("mortality")
        .build()
        .unwrap()
        .run(root.path())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_aggregate_runs_in_memory() {
    use sweep_aggregate::record::DayRecord;
    use sweep_aggregate::run::RunSeries;

    let pipeline = Pipeline::builder().build().unwrap();
    let rate = value(0.05);
    let runs = vec![
        RunSeries::new("mortality", rate, vec![DayRecord::new(0, 10.0, 0.0, 0.0, 0.0)]),
        RunSeries::new("mortality", rate, Vec::new()),
    ];
    assert!(pipeline.aggregate_runs("mortality", runs).unwrap_err().is_empty_run());
}
