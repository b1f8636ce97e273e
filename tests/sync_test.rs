mod common;

use annix::error::ApplyError;
use annix::integrity::compute_hash;
use annix::{AnnixError, Document, SyncState};
use common::{package_file, read, FakeRebuilder};
use pretty_assertions::assert_eq;

#[test]
fn test_stale_file_is_rebuilt_and_stamped() {
    let (_dir, path, annix) = package_file("#@# \nfoo\nbar\n");
    let rebuilder = FakeRebuilder::succeeding();

    let outcome = annix.sync(false, &rebuilder).unwrap();
    assert_eq!(rebuilder.call_count(), 1);

    let doc = Document::parse(&read(&path)).unwrap();
    assert_eq!(doc.stored_hash(), Some(compute_hash(&doc).as_str()));
    assert_eq!(doc.stored_hash(), Some(outcome.hash.as_str()));
}

#[test]
fn test_mismatched_hash_is_rebuilt() {
    let stale = format!("#@# {}\nfoo\n", "0".repeat(64));
    let (_dir, path, annix) = package_file(&stale);
    let rebuilder = FakeRebuilder::succeeding();

    assert_eq!(annix.status().unwrap().state, SyncState::Stale);
    annix.sync(false, &rebuilder).unwrap();

    assert_eq!(rebuilder.call_count(), 1);
    assert_eq!(annix.status().unwrap().state, SyncState::Synced);
    assert!(!read(&path).contains(&"0".repeat(64)));
}

#[test]
fn test_failed_rebuild_keeps_file_and_hash() {
    let original = "#@# \nfoo\n#- bar\n";
    let (_dir, path, annix) = package_file(original);
    let rebuilder = FakeRebuilder::failing();

    let err = annix.sync(false, &rebuilder).unwrap_err();
    assert!(matches!(err, AnnixError::Apply(ApplyError::Failed { .. })));
    assert_eq!(rebuilder.call_count(), 1);
    assert_eq!(read(&path), original);
    assert_eq!(annix.status().unwrap().state, SyncState::Stale);
}

#[test]
fn test_failed_rebuild_keeps_previous_stamp() {
    let (_dir, path, annix) = package_file("#@# \nfoo\n");
    annix.sync(false, &FakeRebuilder::succeeding()).unwrap();
    let stamped = Document::parse(&read(&path)).unwrap().stored_hash().map(str::to_string);

    annix.add(&["bar"]).unwrap();
    let edited = read(&path);
    assert!(annix.sync(false, &FakeRebuilder::failing()).is_err());

    // Edits survive, hash does not advance
    assert_eq!(read(&path), edited);
    let doc = Document::parse(&edited).unwrap();
    assert_eq!(doc.stored_hash().map(str::to_string), stamped);
    assert_eq!(doc.active_packages(), vec!["foo", "bar"]);
}

#[test]
fn test_synced_file_skips_rebuild_unless_forced() {
    let (_dir, path, annix) = package_file("foo\n");
    let rebuilder = FakeRebuilder::succeeding();

    annix.sync(false, &rebuilder).unwrap();
    let stamped = read(&path);
    assert!(stamped.starts_with("#@# "));

    let outcome = annix.sync(false, &rebuilder).unwrap();
    assert!(!outcome.applied);
    assert_eq!(rebuilder.call_count(), 1);

    let outcome = annix.sync(true, &rebuilder).unwrap();
    assert!(outcome.applied);
    assert_eq!(rebuilder.call_count(), 2);
    assert_eq!(read(&path), stamped);
}

#[test]
fn test_forced_rebuild_failure_is_reported() {
    let (_dir, path, annix) = package_file("foo\n");
    annix.sync(false, &FakeRebuilder::succeeding()).unwrap();
    let stamped = read(&path);

    assert!(annix.sync(true, &FakeRebuilder::failing()).is_err());
    assert_eq!(read(&path), stamped);
    assert_eq!(annix.status().unwrap().state, SyncState::Synced);
}

#[test]
fn test_comment_edits_keep_synced_state() {
    let (_dir, path, annix) = package_file("#@# \n{ #@\nfoo\n} #@\n");
    annix.sync(false, &FakeRebuilder::succeeding()).unwrap();

    let edited = read(&path).replace("foo\n", "\n# a note\nfoo   # trailing\n#- gone\n");
    std::fs::write(&path, edited).unwrap();

    assert_eq!(annix.status().unwrap().state, SyncState::Synced);
}
