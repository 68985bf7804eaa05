use std::fs;

use recordstore::store::DocumentStore;
use recordstore::{Config, Record, Snapshot, SnapshotStore, StoreError};
use tempfile::TempDir;

use super::{check_store_contract, sample_snapshot};

fn config_for(temp_dir: &TempDir) -> Config {
    Config::builder()
        .data_dir(temp_dir.path())
        .collection("csv_files")
        .build()
}

fn setup_document_store() -> (TempDir, DocumentStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(&config_for(&temp_dir)).unwrap();
    (temp_dir, store)
}

#[test]
fn test_document_store_contract() {
    let (_temp, store) = setup_document_store();
    check_store_contract(&store, true);
}

#[test]
fn test_table_path() {
    let (temp, store) = setup_document_store();

    assert_eq!(
        store.path(),
        temp.path().join("documents").join("csv_files.db").as_path()
    );
}

#[test]
fn test_table_file_written_on_save() {
    let (_temp, store) = setup_document_store();
    assert!(!store.path().exists());

    store.save(&sample_snapshot("users.txt")).unwrap();

    assert!(store.path().is_file());
}

#[test]
fn test_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let saved = {
        let store = DocumentStore::open(&config).unwrap();
        store.save(&sample_snapshot("users.txt")).unwrap()
    };

    let store = DocumentStore::open(&config).unwrap();
    let loaded = store.load("users.txt").unwrap().unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_insert_sets_both_timestamps_to_save_time() {
    let (_temp, store) = setup_document_store();
    let snapshot = sample_snapshot("users.txt");

    let saved = store.save(&snapshot).unwrap();

    assert_eq!(saved.created_at(), saved.last_modified_at());
    assert_eq!(saved.last_modified_at(), snapshot.last_modified_at());
}

#[test]
fn test_update_in_place_preserves_identity() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let store = DocumentStore::open(&config).unwrap();
    let first = store.save(&sample_snapshot("users.txt")).unwrap();

    let replacement = Snapshot::new(
        "users.txt",
        vec![Record::new(3, "charlie@c.com", "Charlie")],
        "id=3,email=charlie@c.com,name=Charlie",
    );
    store.save(&replacement).unwrap();
    drop(store);

    let store = DocumentStore::open(&config).unwrap();
    let loaded = store.load("users.txt").unwrap().unwrap();
    assert_eq!(loaded.id(), first.id());
    assert_eq!(loaded.created_at(), first.created_at());
    assert_eq!(loaded.records().len(), 1);
    assert_eq!(loaded.raw_text(), "id=3,email=charlie@c.com,name=Charlie");
}

#[test]
fn test_two_stores_on_one_collection_keep_each_others_documents() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let a = DocumentStore::open(&config).unwrap();
    let b = DocumentStore::open(&config).unwrap();

    b.save(&sample_snapshot("x.txt")).unwrap();
    a.save(&sample_snapshot("y.txt")).unwrap();

    assert!(a.load("x.txt").unwrap().is_some());
    assert_eq!(b.list().unwrap().len(), 2);

    assert!(b.remove("y.txt").unwrap());
    assert!(a.load("y.txt").unwrap().is_none());

    let reopened = DocumentStore::open(&config).unwrap();
    assert!(reopened.load("x.txt").unwrap().is_some());
    assert_eq!(reopened.len().unwrap(), 1);
}

#[test]
fn test_separate_collections_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let a = DocumentStore::open(&Config::builder().data_dir(temp_dir.path()).collection("a").build()).unwrap();
    let b = DocumentStore::open(&Config::builder().data_dir(temp_dir.path()).collection("b").build()).unwrap();

    a.save(&sample_snapshot("users.txt")).unwrap();

    assert!(b.load("users.txt").unwrap().is_none());
}

#[test]
fn test_corrupted_table_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    {
        let store = DocumentStore::open(&config).unwrap();
        store.save(&sample_snapshot("users.txt")).unwrap();
    }

    let path = config.collection_path();
    let mut bytes = fs::read(&path).unwrap();
    let mid = bytes.len() / 2 + 7;
    bytes[mid] ^= 0x5a;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        DocumentStore::open(&config),
        Err(StoreError::Corruption(_))
    ));
}

#[test]
fn test_truncated_table_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    fs::create_dir_all(config.collection_path().parent().unwrap()).unwrap();
    fs::write(config.collection_path(), b"RSDT").unwrap();

    assert!(matches!(
        DocumentStore::open(&config),
        Err(StoreError::Corruption(_))
    ));
}

#[test]
fn test_invalid_collection_name() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .collection("../escape")
        .build();

    assert!(matches!(
        DocumentStore::open(&config),
        Err(StoreError::Config(_))
    ));
}
