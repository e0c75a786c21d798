//! Process-wide singleton tests.
//!
//! Everything that swaps the singleton lives in one test so the assertions
//! don't race with each other.

use std::sync::Arc;
use std::thread;

use logkit::{global, LogError, Logger, Options};

#[test]
fn test_init_swaps_and_keeps_old_handles() {
    let before = global::std_logger();
    let derived = global::with_name("before");

    let opts = Options {
        name: "first".into(),
        format: "json".into(),
        output_paths: vec!["stderr".into()],
        ..Options::default()
    };
    global::init(&opts).unwrap();

    let after = global::std_logger();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.name(), "first");
    assert_eq!(before.name(), "");
    assert_eq!(derived.name(), "before");
    assert_eq!(global::with_name("child").name(), "first.child");

    // a failed init leaves the current logger in place
    let bad = Options {
        format: "xml".into(),
        ..Options::default()
    };
    assert!(global::init(&bad).is_err());
    assert!(Arc::ptr_eq(&after, &global::std_logger()));

    let dir = tempfile::tempdir().unwrap();
    let unopenable = Options {
        output_paths: vec![dir.path().join("missing").join("x.log").display().to_string()],
        ..Options::default()
    };
    assert!(matches!(
        Logger::new(Some(&unopenable)),
        Err(LogError::OpenSink { .. })
    ));
    assert!(matches!(
        global::init(&unopenable),
        Err(LogError::OpenSink { .. })
    ));
    assert!(Arc::ptr_eq(&after, &global::std_logger()));

    // concurrent inits: every reader sees a complete logger, last writer wins
    let writers: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let opts = Options {
                    name: format!("w{}", i),
                    output_paths: vec!["stderr".into()],
                    ..Options::default()
                };
                global::init(&opts).unwrap();
            })
        })
        .collect();
    let readers: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..50 {
                    let name = global::std_logger().name().to_string();
                    assert!(name == "first" || name.starts_with('w'), "torn name {:?}", name);
                    global::debugw("stress", &logkit::kvs!["reader", name]);
                }
            })
        })
        .collect();
    for h in writers.into_iter().chain(readers) {
        h.join().unwrap();
    }
    assert!(global::std_logger().name().starts_with('w'));
}
