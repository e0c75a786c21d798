//! `Options::build` installs the process-wide engine behind `tracing` and `log`.
//!
//! The global dispatcher can be set only once per process, so the whole
//! lifecycle is exercised in a single test.

use std::sync::Arc;

use logkit::engine;
use logkit::{Level, LogError, Options};

#[test]
fn test_build_routes_tracing_and_log_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.log");

    let bad = Options {
        format: "yaml".into(),
        ..Options::default()
    };
    assert!(bad.build().is_err());

    // an output path that can't be opened is rejected and nothing is swapped
    let before = engine::global();
    let unopenable = Options {
        output_paths: vec![dir.path().join("missing").join("x.log").display().to_string()],
        ..Options::default()
    };
    assert!(matches!(unopenable.build(), Err(LogError::OpenSink { .. })));
    assert!(Arc::ptr_eq(&before, &engine::global()));

    let opts = Options {
        format: "json".into(),
        level: "not-a-level".into(),
        output_paths: vec![format!("file://{}", path.display())],
        name: "app".into(),
        ..Options::default()
    };
    opts.build().unwrap();

    // unparseable level falls back to info
    assert!(engine::global().enabled(Level::INFO));
    assert!(!engine::global().enabled(Level::DEBUG));

    tracing::info!(user = "ada", "tracing event");
    tracing::debug!("dropped");
    log::warn!("log record {}", 7);

    engine::global().sync().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let entries: Vec<serde_json::Value> = raw
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .filter(|e: &serde_json::Value| e["message"] != "Logging engine installed")
        .collect();

    assert_eq!(entries.len(), 2, "unexpected entries: {}", raw);
    assert_eq!(entries[0]["message"], "tracing event");
    assert_eq!(entries[0]["logger"], "app");
    assert_eq!(entries[0]["user"], "ada");
    assert!(entries[0]["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/build_test.rs:"));

    assert_eq!(entries[1]["message"], "log record 7");
    assert_eq!(entries[1]["level"], "WARN");
    assert!(entries[1]["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/build_test.rs:"));

    // a second build swaps the engine behind the same dispatcher
    let quiet = Options {
        level: "error".into(),
        output_paths: vec![path.to_str().unwrap().to_string()],
        ..opts.clone()
    };
    quiet.build().unwrap();
    assert!(!engine::global().enabled(Level::WARN));
}
