//! Concurrency tests for the append-only store.
//!
//! Appends issued from many tasks at once must each land as exactly one
//! intact line.

use std::collections::HashSet;
use std::sync::Arc;

use tailrelay_core::{BroadcastRegistry, LogLine, LogStore};
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fifty_parallel_appends_are_all_persisted_once() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LogStore::new(dir.path().join(".debug.log")));

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let line = LogLine::new(&format!("{{\"seq\":{i},\"pad\":\"{}\"}}", "x".repeat(i * 37)))
                    .unwrap();
                store.append(&line).await.unwrap();
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let contents = store.read_all().await;
    assert!(contents.ends_with('\n'));
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 50);

    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(unique.len(), 50);
    for i in 0..50 {
        let expected = format!("{{\"seq\":{i},\"pad\":\"{}\"}}", "x".repeat(i * 37));
        assert!(unique.contains(expected.as_str()), "missing line {i}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn persist_then_publish_reaches_every_subscriber() {
    let dir = TempDir::new().unwrap();
    let store = LogStore::new(dir.path().join(".debug.log"));
    let registry = BroadcastRegistry::with_defaults();
    let mut viewers: Vec<_> = (0..3).map(|_| registry.subscribe()).collect();

    let line = LogLine::new("{\"hypothesis\":\"x is null\"}").unwrap();
    store.append(&line).await.unwrap();
    assert_eq!(registry.publish(line.as_str()), 3);

    assert_eq!(store.read_all().await, "{\"hypothesis\":\"x is null\"}\n");
    for viewer in &mut viewers {
        assert_eq!(
            viewer.recv().await.as_deref(),
            Some("{\"hypothesis\":\"x is null\"}")
        );
    }
}
