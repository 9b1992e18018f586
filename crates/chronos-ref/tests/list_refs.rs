//! Enumeration of refs on disk.

use std::fs;

use chronos_hash::ObjectId;
use chronos_ref::{FileRefStore, RefName};

fn oid(fill: char) -> ObjectId {
    ObjectId::from_hex(&fill.to_string().repeat(40)).unwrap()
}

#[test]
fn lists_sorted_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRefStore::new(dir.path());

    store.write_ref(&RefName::tag("v2").unwrap(), &oid('b')).unwrap();
    store.write_ref(&RefName::branch("master").unwrap(), &oid('a')).unwrap();
    store.write_ref(&RefName::tag("v1").unwrap(), &oid('c')).unwrap();
    store
        .write_ref(&RefName::new("refs/remotes/origin/master").unwrap(), &oid('d'))
        .unwrap();
    store
        .write_ref(&RefName::branch("feature/x").unwrap(), &oid('e'))
        .unwrap();

    let names: Vec<String> = store
        .list_refs("refs")
        .unwrap()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(
        names,
        [
            "refs/heads/feature/x",
            "refs/heads/master",
            "refs/remotes/origin/master",
            "refs/tags/v1",
            "refs/tags/v2",
        ]
    );

    let tags = store.list_refs("refs/tags").unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].1, oid('c'));
}

#[test]
fn symbolic_refs_resolve_and_broken_ones_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRefStore::new(dir.path());
    let master = RefName::branch("master").unwrap();
    store.write_ref(&master, &oid('a')).unwrap();
    store
        .write_symbolic_ref(&RefName::new("refs/remotes/origin/HEAD").unwrap(), &master)
        .unwrap();
    store
        .write_symbolic_ref(
            &RefName::branch("dangling").unwrap(),
            &RefName::branch("nowhere").unwrap(),
        )
        .unwrap();

    let refs = store.list_refs("refs").unwrap();
    assert_eq!(refs.len(), 2);
    assert!(refs.iter().all(|(_, id)| *id == oid('a')));
}

#[test]
fn missing_namespace_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRefStore::new(dir.path());
    assert!(store.list_refs("refs").unwrap().is_empty());

    fs::create_dir_all(dir.path().join("refs/tags")).unwrap();
    assert!(store.list_refs("refs/tags").unwrap().is_empty());
}
