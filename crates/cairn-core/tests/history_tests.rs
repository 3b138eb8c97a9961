use std::fs;
use std::path::PathBuf;

use cairn_core::history::{totals, HistoryStore};
use cairn_core::models::ExecutionCostData;
use tempfile::TempDir;

fn plan_path(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("feature.md");
    fs::write(&path, "[Coding Aider Plan]\n# Feature\n").expect("Failed to write plan");
    path
}

fn entry(ts: &str, summary: &str) -> ExecutionCostData {
    ExecutionCostData {
        timestamp: ts.parse().expect("Bad test timestamp"),
        tokens_sent: 7200,
        tokens_received: 1300,
        message_cost: 0.01,
        session_cost: 0.01,
        model: "gpt-4".to_string(),
        summary: summary.to_string(),
    }
}

#[test]
fn test_append_creates_history_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = HistoryStore::for_plan(&plan_path(&temp_dir));

    store
        .append(&entry("2024-01-01T10:00:00", "first step"))
        .expect("Failed to append");

    assert_eq!(
        store.path(),
        temp_dir.path().join("feature_history.md").as_path()
    );
    let content = fs::read_to_string(store.path()).expect("Failed to read history");
    assert!(content.starts_with("# Execution History: feature"));
    assert!(content.contains("<!-- EXECUTION_HISTORY_START -->"));
    assert!(content.contains("<!-- EXEC_DATA: 2024-01-01T10:00:00,gpt-4,7200,1300,0.01,0.01,first step -->"));
    assert!(content.contains("| 2024-01-01 10:00:00 | gpt-4 | 7.2k / 1.3k | $0.0100 | first step |"));
    assert!(content.contains("**Executions:** 1"));
}

#[test]
fn test_append_is_idempotent_for_identical_entries() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = HistoryStore::for_plan(&plan_path(&temp_dir));
    let e = entry("2024-01-01T10:00:00", "same step");

    store.append(&e).expect("Failed to append");
    store.append(&e).expect("Failed to append again");

    assert_eq!(store.entries().len(), 1);
}

#[test]
fn test_entries_round_trip_through_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = HistoryStore::for_plan(&plan_path(&temp_dir));

    let first = entry("2024-01-01T10:00:00", "with, comma\nand newline");
    let second = ExecutionCostData {
        session_cost: 0.02,
        ..entry("2024-01-02T11:30:00", "second step")
    };
    store.append(&first).expect("Failed to append");
    store.append(&second).expect("Failed to append");

    let read_back = store.entries();
    assert_eq!(read_back.len(), 2);
    // Oldest first, escaping reversed.
    assert_eq!(read_back[0].summary, "with, comma\nand newline");
    assert_eq!(read_back[1].timestamp, second.timestamp);
    assert_eq!(read_back[1].tokens_sent, 7200);

    let sums = totals(&read_back);
    assert_eq!(sums.executions, 2);
    assert_eq!(sums.tokens_sent, 14400);
    assert!((sums.total_cost - 0.02).abs() < 1e-9);
}

#[test]
fn test_table_rendered_newest_first() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = HistoryStore::for_plan(&plan_path(&temp_dir));

    store
        .append(&entry("2024-01-01T10:00:00", "older"))
        .expect("Failed to append");
    store
        .append(&entry("2024-01-02T10:00:00", "newer"))
        .expect("Failed to append");

    let content = fs::read_to_string(store.path()).expect("Failed to read history");
    let newer = content.find("| 2024-01-02 10:00:00 |").unwrap();
    let older = content.find("| 2024-01-01 10:00:00 |").unwrap();
    assert!(newer < older);
    assert!(content.contains("**Executions:** 2"));
}

#[test]
fn test_recovery_from_table_only_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plan = plan_path(&temp_dir);
    // A hand-edited file: structured comment block stripped, table kept.
    fs::write(
        temp_dir.path().join("feature_history.md"),
        "\
# Execution History: feature

## Execution Summary

| Date | Model | Tokens (Sent/Received) | Cost | Notes |
| ---- | ----- | --------------------- | ---- | ----- |
| 2024-01-01 10:00:00 | gpt-4 | 7.2k / 1.3k | $0.0100 | early work |
",
    )
    .expect("Failed to write history");

    let store = HistoryStore::for_plan(&plan);
    let recovered = store.entries();

    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].model, "gpt-4");
    assert_eq!(recovered[0].tokens_sent, 7200);
    assert_eq!(recovered[0].tokens_received, 1300);
    assert!((recovered[0].session_cost - 0.01).abs() < 1e-9);
}

#[test]
fn test_append_preserves_table_recovered_entries() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plan = plan_path(&temp_dir);
    fs::write(
        temp_dir.path().join("feature_history.md"),
        "| 2024-01-01 10:00:00 | gpt-4 | 7.2k / 1.3k | $0.0100 | early work |\n",
    )
    .expect("Failed to write history");

    let store = HistoryStore::for_plan(&plan);
    store
        .append(&entry("2024-01-02T12:00:00", "new step"))
        .expect("Failed to append");

    let read_back = store.entries();
    assert_eq!(read_back.len(), 2);
    assert_eq!(read_back[0].summary, "early work");
    assert_eq!(read_back[1].summary, "new step");

    // The rewrite regenerated the structured block for both entries.
    let content = fs::read_to_string(store.path()).expect("Failed to read history");
    assert_eq!(content.matches("<!-- EXEC_DATA: ").count(), 2);
}

#[test]
fn test_corrupted_file_never_loses_the_write() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plan = plan_path(&temp_dir);
    fs::write(
        temp_dir.path().join("feature_history.md"),
        "complete garbage \u{0} with no recoverable structure",
    )
    .expect("Failed to write history");

    let store = HistoryStore::for_plan(&plan);
    store
        .append(&entry("2024-01-02T12:00:00", "survives"))
        .expect("Failed to append");

    let read_back = store.entries();
    assert_eq!(read_back.len(), 1);
    assert_eq!(read_back[0].summary, "survives");
}

#[test]
fn test_ensure_exists_writes_skeleton() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = HistoryStore::for_plan(&plan_path(&temp_dir));

    store.ensure_exists().expect("Failed to create skeleton");

    let content = fs::read_to_string(store.path()).expect("Failed to read history");
    assert!(content.contains("<!-- EXECUTION_HISTORY_START -->"));
    assert!(content.contains("<!-- EXECUTION_HISTORY_END -->"));
    assert!(content.contains("**Executions:** 0"));
    assert!(store.entries().is_empty());

    // Idempotent: a second call leaves the file alone.
    store.ensure_exists().expect("ensure_exists should be idempotent");
}
