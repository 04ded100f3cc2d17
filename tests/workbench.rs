mod common;

use std::sync::Arc;

use parqlab::workbench::Workbench;

use common::{offline_provisioner, write_episode_fixture};

fn workbench() -> Workbench {
    Workbench::new(Arc::new(offline_provisioner()), "dataset")
}

#[test]
fn close_clears_all_session_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fixture = write_episode_fixture(dir.path(), "episode.parquet", 5);
    let mut wb = workbench();

    wb.load(&fixture.display().to_string(), Some("episode"));
    assert!(wb.is_loaded());
    assert_eq!(wb.table_name(), Some("episode"));
    assert_eq!(wb.row_count(), Some(5));

    wb.query("SELECT * FROM episode");
    assert!(wb.results().is_some());

    wb.close();
    assert!(!wb.is_loaded());
    assert_eq!(wb.table_name(), None);
    assert_eq!(wb.row_count(), None);
    assert!(wb.results().is_none());
    assert_eq!(wb.last_error(), None);
}

#[test]
fn load_failure_sets_banner_and_keeps_prior_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fixture = write_episode_fixture(dir.path(), "episode.parquet", 5);
    let mut wb = workbench();

    wb.load(&fixture.display().to_string(), Some("episode"));
    assert!(wb.is_loaded());

    wb.load("", None);
    assert_eq!(wb.last_error(), Some("URL is required"));
    // The failed load leaves the previous session in place.
    assert!(wb.is_loaded());
    assert_eq!(wb.table_name(), Some("episode"));

    wb.query("SELECT count(*) AS n FROM episode");
    assert!(wb.results().is_some());
}

#[test]
fn query_failure_clears_stale_results_but_keeps_the_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fixture = write_episode_fixture(dir.path(), "episode.parquet", 5);
    let mut wb = workbench();

    wb.load(&fixture.display().to_string(), None);
    wb.query("SELECT * FROM dataset");
    assert!(wb.results().is_some());

    wb.query("SELECT nope FROM dataset");
    assert!(wb.last_error().is_some());
    assert!(wb.results().is_none());
    assert!(wb.is_loaded());

    wb.query("SELECT * FROM dataset");
    assert!(wb.results().is_some());
    assert_eq!(wb.last_error(), None);
}

#[test]
fn query_without_a_loaded_table_sets_banner() {
    let mut wb = workbench();
    wb.query("SELECT 1");
    assert_eq!(wb.last_error(), Some("no table loaded"));
    assert!(wb.results().is_none());
}

#[test]
fn rendering_truncates_and_reports_the_true_total() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fixture = write_episode_fixture(dir.path(), "episode.parquet", 10);
    let mut wb = workbench();

    wb.load(&fixture.display().to_string(), None);
    wb.query("SELECT step, label FROM dataset ORDER BY step");

    let rendered = wb.render_results(3).expect("rendered table");
    assert!(rendered.contains("step"));
    assert!(rendered.contains("frame_0"));
    assert!(!rendered.contains("frame_9"));
    assert!(rendered.contains("showing first 3 of 10 rows"));

    let full = wb.render_results(100).expect("rendered table");
    assert!(full.contains("frame_9"));
    assert!(full.contains("10 rows"));
}
