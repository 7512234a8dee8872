use npt_core::core::engine::Operation;
use npt_core::persistence::{import_dump, load_snapshot, save_snapshot};
use npt_core::NptEngine;
use std::fs;

fn engine_with(names: &[&str]) -> NptEngine {
    let mut engine = NptEngine::new();
    for name in names {
        engine.insert_name(name);
    }
    engine
}

#[test]
fn persisted_file_matches_live_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("npt_output.txt");
    let engine = engine_with(&["an", "and", "ant", "bee", ""]);

    engine.persist_dump_to_file(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), engine.dump_text());
}

#[test]
fn exported_dump_imports_to_same_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("npt_output.txt");
    let mut engine = engine_with(&["Zoë", "a b", "x (y)", "名前", ""]);
    engine.delete_name("a b");

    engine.persist_dump_to_file(&path).unwrap();
    let restored = import_dump(&path).unwrap();
    assert_eq!(restored.render_dump(), engine.dump_text());
    assert!(!restored.lookup("a b"));
}

#[test]
fn snapshot_keeps_structure_and_probabilities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.bin");
    let mut engine = engine_with(&["and", "ant"]);
    engine.delete_name("ant");
    engine.reporter.probabilities.set('q', 1.0);

    save_snapshot(&engine, &path).unwrap();
    let restored = load_snapshot(&path).unwrap();
    assert_eq!(restored.dump_text(), "and (and)");
    assert_eq!(restored.trie.node_count(), engine.trie.node_count());
    assert_eq!(restored.reporter.probabilities, engine.reporter.probabilities);
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.bin");
    fs::write(&path, [0xff, 0x01]).unwrap();
    assert!(load_snapshot(&path).is_err());
    assert!(load_snapshot(&dir.path().join("missing.bin")).is_err());
}

#[test]
fn save_operation_reports_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let mut engine = engine_with(&["an"]).with_dump_path(blocker.join("out.txt"));
    assert!(engine.execute(Operation::Save).is_err());
}
