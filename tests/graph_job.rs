//! End to end runs over files on disk.

use pfa_jre_graph::chart::ChartSink;
use pfa_jre_graph::cli::{parse_cli_from, GraphConfig};
use pfa_jre_graph::{run, GraphError, Query};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DATA: &str = "\
Q,JOB1    ,T1,100,1,500,20210101000000
Q,JOB1    ,T1,100,1,600,20210101000100
Q/JOB1    /T2/200/2/50/20210101000200
S,JOB1    ,T2,200,3,4096,20210101000200
Q,OTHER   ,T9,300,4,1,20210101000300
";

const CAPACITY: &str = "\
JQE     ,1000
SPOOL   /80
";

fn setup(capacity: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("SY1.5day.All.data");
    let cap = dir.path().join("Capacity.data");
    fs::write(&data, DATA).unwrap();
    fs::write(&cap, capacity).unwrap();
    (dir, data, cap)
}

fn config(data: &Path, cap: &Path, job: &str, resource: &str, out: &Path) -> GraphConfig {
    let mut c = parse_cli_from(vec![
        "jre_graph_job",
        data.to_str().unwrap(),
        cap.to_str().unwrap(),
        job,
        resource,
    ])
    .unwrap();
    c.sink = ChartSink::File(out.to_path_buf());
    c
}

#[test]
fn graphs_latest_cohort_of_job() {
    let (dir, data, cap) = setup(CAPACITY);
    let out = dir.path().join("JOB1_JQE_graph.svg");
    let series = run(&config(&data, &cap, "job1", "jqe", &out)).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series.points[0].current_usage, 50);
    assert_eq!(series.points[0].capacity, 1000);
    assert_eq!(series.start_time(), Some("200"));
    assert!(fs::read_to_string(&out).unwrap().contains("<svg"));
}

#[test]
fn csv_export_and_verbose() {
    let (dir, data, cap) = setup(CAPACITY);
    let out = dir.path().join("graph.svg");
    let csv = dir.path().join("series.csv");
    let mut c = config(&data, &cap, "JOB1", "SPOOL", &out);
    c.verbose = true;
    c.csv_out = Some(csv.clone());
    run(&c).unwrap();
    assert_eq!(
        fs::read_to_string(&csv).unwrap(),
        "datetime,current_usage,capacity\n2021-01-01 00:02:00,4096,80\n"
    );
}

#[test]
fn missing_files_are_reported() {
    let (dir, data, cap) = setup(CAPACITY);
    let out = dir.path().join("graph.svg");
    let missing = dir.path().join("nope.data");

    let err = run(&config(&missing, &cap, "JOB1", "JQE", &out)).unwrap_err();
    assert!(matches!(err, GraphError::InputNotFound { kind: "data", .. }));
    let err = run(&config(&data, &missing, "JOB1", "JQE", &out)).unwrap_err();
    assert!(matches!(err, GraphError::InputNotFound { kind: "capacity", .. }));
    assert!(!out.exists());
}

#[test]
fn no_graph_for_unknown_job_or_resource() {
    let (dir, data, cap) = setup(CAPACITY);
    let out = dir.path().join("graph.svg");

    let err = run(&config(&data, &cap, "JOBY", "JQE", &out)).unwrap_err();
    assert!(matches!(err, GraphError::JobNotFound(_)));
    let err = run(&config(&data, &cap, "JOB1", "BERT", &out)).unwrap_err();
    assert!(matches!(err, GraphError::CapacityNotFound(_)));
    assert!(!out.exists());
}

#[test]
fn malformed_capacity_file_is_a_parse_error() {
    let (dir, data, cap) = setup("JQE     ,1000,extra\n");
    let out = dir.path().join("graph.svg");
    let err = run(&config(&data, &cap, "JOB1", "JQE", &out)).unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 1, .. }));
}

#[test]
fn query_from_user_input() {
    let q = Query::parse("Spool", " job1 ").unwrap();
    assert_eq!(q.padded_job_name(), "JOB1    ");
    assert_eq!(q.job_name(), "JOB1");
    assert!(matches!(
        Query::parse("CPU", "job1"),
        Err(GraphError::InvalidResource(_))
    ));
}
