//! Tests for the persisted group store

use dockhand::groups::{GroupStore, GroupStoreError};
use std::sync::Arc;

fn store() -> (GroupStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = GroupStore::open_in(dir.path()).unwrap();
    (store, dir)
}

#[test]
fn test_groups_survive_reopen() {
    let (store, dir) = store();
    let web = store
        .create("web", "frontend stack", vec!["c1".into(), "c2".into()])
        .unwrap();
    store.create("db", "", vec![]).unwrap();
    drop(store);

    let reopened = GroupStore::open_in(dir.path()).unwrap();
    let groups = reopened.list().unwrap();
    assert_eq!(groups.len(), 2);
    let loaded = reopened.get(&web.id).unwrap();
    assert_eq!(loaded.name, "web");
    assert_eq!(loaded.description, "frontend stack");
    assert_eq!(loaded.container_ids, vec!["c1", "c2"]);
}

#[test]
fn test_new_groups_get_distinct_colors() {
    let (store, _dir) = store();
    let a = store.create("a", "", vec![]).unwrap();
    let b = store.create("b", "", vec![]).unwrap();
    assert_ne!(a.color, b.color);
    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_add_member_is_idempotent() {
    let (store, _dir) = store();
    let group = store.create("web", "", vec![]).unwrap();
    store.add_member(&group.id, "c1").unwrap();
    store.add_member(&group.id, "c1").unwrap();
    assert_eq!(store.get(&group.id).unwrap().container_ids, vec!["c1"]);
}

#[test]
fn test_remove_member() {
    let (store, _dir) = store();
    let group = store
        .create("web", "", vec!["c1".into(), "c2".into()])
        .unwrap();
    store.remove_member(&group.id, "c1").unwrap();
    assert_eq!(store.get(&group.id).unwrap().container_ids, vec!["c2"]);
}

#[test]
fn test_update_bumps_modified() {
    let (store, _dir) = store();
    let mut group = store.create("web", "", vec![]).unwrap();
    group.name = "frontend".into();
    group.container_ids = vec!["c9".into()];
    let updated = store.update(&group).unwrap();
    assert_eq!(updated.name, "frontend");
    assert_eq!(updated.container_ids, vec!["c9"]);
    assert!(updated.modified >= group.modified);
    assert_eq!(updated.created, group.created);
}

#[test]
fn test_delete_unknown_group_fails() {
    let (store, _dir) = store();
    let err = store.delete("nope").unwrap_err();
    assert!(matches!(err, GroupStoreError::NotFound(id) if id == "nope"));
}

#[test]
fn test_delete_removes_group() {
    let (store, _dir) = store();
    let group = store.create("web", "", vec![]).unwrap();
    store.delete(&group.id).unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(store.get(&group.id).is_err());
}

#[test]
fn test_replace_member_after_recreate() {
    let (store, _dir) = store();
    let a = store
        .create("a", "", vec!["old".into(), "other".into()])
        .unwrap();
    let b = store.create("b", "", vec!["old".into()]).unwrap();
    let c = store.create("c", "", vec!["other".into()]).unwrap();

    let touched = store.replace_member("old", "new").unwrap();
    assert_eq!(touched, 2);
    assert_eq!(store.get(&a.id).unwrap().container_ids, vec!["new", "other"]);
    assert_eq!(store.get(&b.id).unwrap().container_ids, vec!["new"]);
    assert_eq!(store.get(&c.id).unwrap().container_ids, vec!["other"]);
}

#[test]
fn test_replace_member_does_not_duplicate() {
    let (store, _dir) = store();
    let group = store
        .create("a", "", vec!["old".into(), "new".into()])
        .unwrap();
    store.replace_member("old", "new").unwrap();
    assert_eq!(store.get(&group.id).unwrap().container_ids, vec!["new"]);
}

#[test]
fn test_remove_member_everywhere() {
    let (store, _dir) = store();
    let a = store.create("a", "", vec!["gone".into(), "x".into()]).unwrap();
    let b = store.create("b", "", vec!["gone".into()]).unwrap();
    store.create("c", "", vec!["x".into()]).unwrap();

    assert_eq!(store.remove_member_everywhere("gone").unwrap(), 2);
    assert_eq!(store.get(&a.id).unwrap().container_ids, vec!["x"]);
    assert!(store.get(&b.id).unwrap().container_ids.is_empty());
}

#[test]
fn test_concurrent_adds_are_serialized() {
    let (store, dir) = store();
    let group = store.create("busy", "", vec![]).unwrap();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = Arc::clone(&store);
            let id = group.id.clone();
            std::thread::spawn(move || store.add_member(&id, &format!("c{}", n)).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get(&group.id).unwrap().container_ids.len(), 8);
    let reopened = GroupStore::open_in(dir.path()).unwrap();
    assert_eq!(reopened.get(&group.id).unwrap().container_ids.len(), 8);
}

#[test]
fn test_document_format() {
    let (store, dir) = store();
    store.create("web", "", vec!["c1".into()]).unwrap();
    let raw = std::fs::read_to_string(dir.path().join("groups.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["version"], "1.0");
    assert_eq!(doc["groups"][0]["name"], "web");
    assert_eq!(doc["groups"][0]["container_ids"][0], "c1");
    assert!(doc["last_modified"].is_string());
}
