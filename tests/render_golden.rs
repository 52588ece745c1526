//! Golden-file tests for the rendered nginx configuration.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use router_config::config::{load_snapshot, Precedence, RouterConfig};
use router_config::{render_config, write_config, Reconciler, RenderError};

fn golden(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/golden").join(name);
    fs::read_to_string(path).unwrap()
}

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn test_defaults_match_golden() {
    let rendered = render_config(&RouterConfig::default()).unwrap();
    assert_eq!(rendered, golden("defaults.conf"));
}

#[test]
fn test_full_snapshot_matches_golden() {
    let snapshot = load_snapshot(&fixture("full.toml")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nginx.conf");

    let reconciler = Reconciler::new(Precedence::ConfigMapWins).unwrap();
    let config = reconciler.run(&snapshot, &out).unwrap();

    assert_eq!(config.worker_processes, "4");
    assert_eq!(config.gzip.as_ref().unwrap().comp_level, "9");
    assert_eq!(fs::read_to_string(&out).unwrap(), golden("full.conf"));
}

#[test]
fn test_rendering_twice_is_byte_identical() {
    let snapshot = load_snapshot(&fixture("full.toml")).unwrap();
    let reconciler = Reconciler::new(Precedence::default()).unwrap();
    assert_eq!(
        reconciler.render(&snapshot).unwrap(),
        reconciler.render(&snapshot).unwrap()
    );
}

#[test]
fn test_write_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nginx.conf");
    fs::write(&out, "stale contents that are much longer than nothing at all").unwrap();

    write_config(&RouterConfig::default(), &out).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), golden("defaults.conf"));
}

#[test]
fn test_unwritable_destination_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing-dir").join("nginx.conf");

    let err = write_config(&RouterConfig::default(), &out).unwrap_err();
    assert!(err.is_io());
    assert!(matches!(err, RenderError::Create { .. }));
}
