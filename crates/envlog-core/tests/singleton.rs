use envlog_core::{logging, Level, Logger, Output};
use serde_json::Value;
use std::io::Write;

const VARS: [&str; 4] = ["LOG_LEVEL", "LOG_FORMAT", "LOG_OUTPUT", "LOG_PATH"];

#[test]
fn test_concurrent_first_access_shares_one_logger() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("app.log");
    let mut env = std::fs::File::create(dir.path().join(".env")).unwrap();
    writeln!(env, "LOG_LEVEL=info").unwrap();
    writeln!(env, "LOG_FORMAT=json").unwrap();
    writeln!(env, "LOG_OUTPUT=file").unwrap();
    writeln!(env, "LOG_PATH=\"{}\"", log_path.display()).unwrap();
    drop(env);

    for var in VARS {
        std::env::remove_var(var);
    }
    std::env::set_current_dir(dir.path()).unwrap();

    let loggers: Vec<&'static Logger> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| logging::instance().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let first = loggers[0];
    assert!(loggers.iter().all(|l| std::ptr::eq(*l, first)));
    assert!(std::ptr::eq(logging::instance().unwrap(), first));

    assert_eq!(first.level(), Level::Info);
    assert_eq!(first.output(), Output::File);
    assert_eq!(first.settings().path(), log_path.to_string_lossy());

    first.debug("filtered out");
    first.info("hello from the singleton");

    let global = logging::setup().unwrap();
    assert!(std::ptr::eq(global, first));
    tracing::warn!(component = "tests", "through the global subscriber");

    let records: Vec<Value> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["level"], "info");
    assert_eq!(records[0]["msg"], "hello from the singleton");
    assert_eq!(records[1]["level"], "warn");
    assert_eq!(records[1]["msg"], "through the global subscriber");
    assert_eq!(records[1]["component"], "tests");
}
