use std::{fs, io::Cursor};

use rpqbench::{Bench, CardStat, EstimatorKind, PerfRecorder, QueryMode, RpqError};
use tempfile::TempDir;

const SAMPLE_SOURCE: &str = "3,3,2\n0 0 1 .\n1 0 2 .\n0 1 2 .\n";

fn loaded_bench(recorder: &PerfRecorder, kind: EstimatorKind) -> Bench<'_> {
    let mut bench = Bench::new(recorder, kind, QueryMode::Lenient);
    bench
        .load_graph_from_reader(Cursor::new(SAMPLE_SOURCE))
        .expect("graph");
    bench
}

#[test]
fn test_full_run_from_files() {
    let dir = TempDir::new().expect("tempdir");
    let graph_path = dir.path().join("graph.nt");
    let queries_path = dir.path().join("queries.csv");
    fs::write(&graph_path, SAMPLE_SOURCE).unwrap();
    fs::write(&queries_path, "*,0+/0+,*\n*,1+,*\n\n*,0-/1-,*\n").unwrap();

    let recorder = PerfRecorder::new();
    let mut bench = Bench::new(&recorder, EstimatorKind::Zero, QueryMode::Lenient);
    let summary = bench.load_graph(&graph_path).unwrap();
    assert_eq!(summary.edges_added, 3);
    assert_eq!(bench.load_queries(&queries_path).unwrap(), 3);
    bench.prepare().unwrap();

    let reports = bench.run_queries().unwrap();
    let actual: Vec<_> = reports.iter().map(|r| r.actual.unwrap().path_count).collect();
    assert_eq!(actual, vec![1, 1, 0]);
    assert_eq!(reports[1].actual, Some(CardStat::new(1, 1, 1)));
    assert!(reports.iter().all(|r| r.estimate == Some(CardStat::default())));
    assert!(reports.iter().all(|r| r.is_ok()));
}

#[test]
fn test_run_without_graph_fails() {
    let recorder = PerfRecorder::new();
    let mut bench = Bench::new(&recorder, EstimatorKind::Summary, QueryMode::Lenient);
    bench.load_query("*,0+,*").unwrap();
    assert!(matches!(bench.run_queries(), Err(RpqError::GraphNotLoaded)));
}

#[test]
fn test_run_without_queries_fails() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Summary);
    bench.prepare().unwrap();
    assert!(matches!(bench.run_queries(), Err(RpqError::NoQueries)));
}

#[test]
fn test_run_without_prepare_fails() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Summary);
    bench.load_query("*,0+,*").unwrap();
    assert!(!bench.is_prepared());
    assert!(matches!(bench.run_queries(), Err(RpqError::NotPrepared)));
}

#[test]
fn test_reloading_graph_discards_preparation() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Summary);
    bench.prepare().unwrap();
    assert!(bench.is_prepared());
    bench
        .load_graph_from_reader(Cursor::new(SAMPLE_SOURCE))
        .unwrap();
    assert!(!bench.is_prepared());
}

#[test]
fn test_lenient_mode_drops_bad_lines() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Zero);
    let loaded = bench
        .load_queries_from_reader(Cursor::new("*,0+,*\nnot a query\n,1+,*\n*,1+,*\n"))
        .unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(bench.queries()[1].path, "1+");
}

#[test]
fn test_strict_mode_rejects_bad_lines() {
    let recorder = PerfRecorder::new();
    let mut bench = Bench::new(&recorder, EstimatorKind::Zero, QueryMode::Strict);
    let err = bench
        .load_queries_from_reader(Cursor::new("*,0+,*\nnot a query\n"))
        .unwrap_err();
    assert!(matches!(err, RpqError::InvalidQuery(_)));
}

#[test]
fn test_single_query_replaces_workload() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Zero);
    bench
        .load_queries_from_reader(Cursor::new("*,0+,*\n*,1+,*\n"))
        .unwrap();
    assert_eq!(bench.load_query("*,0+/1-,*").unwrap(), 1);
    assert_eq!(bench.queries().len(), 1);
    assert_eq!(bench.queries()[0].path, "0+/1-");
}

#[test]
fn test_failing_query_does_not_abort_run() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Summary);
    bench
        .load_queries_from_reader(Cursor::new("*,0+/x,*\n*,1+,*\n"))
        .unwrap();
    bench.prepare().unwrap();
    let reports = bench.run_queries().unwrap();
    assert_eq!(reports.len(), 2);
    assert!(!reports[0].is_ok());
    assert!(reports[0].actual.is_none());
    assert!(reports[0].render_text().contains("Failed:"));
    assert_eq!(reports[1].actual, Some(CardStat::new(1, 1, 1)));
    assert_eq!(reports[1].estimate, Some(CardStat::new(1, 1, 1)));
}

#[test]
fn test_every_phase_is_timed() {
    let recorder = PerfRecorder::new();
    let mut bench = loaded_bench(&recorder, EstimatorKind::Summary);
    bench
        .load_queries_from_reader(Cursor::new("*,0+,*\n*,1-,*\n"))
        .unwrap();
    bench.prepare().unwrap();
    bench.run_queries().unwrap();

    let labels: Vec<String> = recorder.snapshot().into_iter().map(|t| t.label).collect();
    assert_eq!(labels[0], "read the graph into memory");
    assert_eq!(labels[1], "prepare the estimator");
    assert_eq!(labels.iter().filter(|l| *l == "estimate").count(), 2);
    assert_eq!(labels.iter().filter(|l| *l == "evaluate").count(), 2);
}
