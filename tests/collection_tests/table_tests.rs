//! Tests for RecordCollection
//!
//! These tests verify:
//! - Lookup by id
//! - Uniqueness on insert
//! - Full and partial field replacement
//! - Removal preserving order

use recordstore::collection::{FieldUpdate, RecordCollection};
use recordstore::{Record, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn collection_with_two() -> RecordCollection {
    RecordCollection::from_records(vec![
        Record::new(1, "alice@example.com", "Alice"),
        Record::new(2, "bob@example.com", "Bob"),
    ])
}

fn ids(collection: &RecordCollection) -> Vec<i64> {
    collection.iter().map(Record::id).collect()
}

// =============================================================================
// Find / Insert Tests
// =============================================================================

#[test]
fn test_find() {
    let collection = collection_with_two();

    assert_eq!(collection.find(1), Some(0));
    assert_eq!(collection.find(2), Some(1));
    assert_eq!(collection.find(3), None);
}

#[test]
fn test_insert_appends() {
    let mut collection = collection_with_two();

    collection
        .insert(Record::new(3, "charlie@example.com", "Charlie"))
        .unwrap();

    assert_eq!(ids(&collection), vec![1, 2, 3]);
}

#[test]
fn test_insert_duplicate_rejected() {
    let mut collection = collection_with_two();

    let err = collection
        .insert(Record::new(1, "other@example.com", "Other"))
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateKey { id: 1 }));
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.get(1).unwrap().name, "Alice");
}

#[test]
fn test_insert_into_empty() {
    let mut collection = RecordCollection::new();
    assert!(collection.is_empty());

    collection.insert(Record::new(42, "x@y.z", "X")).unwrap();

    assert_eq!(collection.len(), 1);
}

// =============================================================================
// Replace Tests
// =============================================================================

#[test]
fn test_full_update_overwrites_both() {
    let mut collection = collection_with_two();

    let updated = collection
        .replace_fields(
            1,
            FieldUpdate::Full {
                email: "alice.new@example.com".to_string(),
                name: "Alice Smith".to_string(),
            },
        )
        .unwrap();

    assert_eq!(updated, &Record::new(1, "alice.new@example.com", "Alice Smith"));
}

#[test]
fn test_full_update_missing_id() {
    let mut collection = collection_with_two();

    let err = collection
        .replace_fields(
            99,
            FieldUpdate::Full {
                email: "x".to_string(),
                name: "y".to_string(),
            },
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::RecordNotFound { id: 99 }));
    assert_eq!(collection, collection_with_two());
}

#[test]
fn test_partial_update_only_email() {
    let mut collection = collection_with_two();

    collection
        .replace_fields(2, FieldUpdate::partial(Some("bobby@example.com"), None))
        .unwrap();

    let bob = collection.get(2).unwrap();
    assert_eq!(bob.email, "bobby@example.com");
    assert_eq!(bob.name, "Bob");
}

#[test]
fn test_partial_update_empty_values_ignored() {
    let mut collection = collection_with_two();

    collection
        .replace_fields(2, FieldUpdate::partial(Some(""), Some("")))
        .unwrap();

    assert_eq!(collection, collection_with_two());
}

#[test]
fn test_partial_update_empty_strings_inside_variant_ignored() {
    let mut collection = collection_with_two();

    collection
        .replace_fields(
            1,
            FieldUpdate::Partial {
                email: Some(String::new()),
                name: Some("Alicia".to_string()),
            },
        )
        .unwrap();

    let alice = collection.get(1).unwrap();
    assert_eq!(alice.email, "alice@example.com");
    assert_eq!(alice.name, "Alicia");
}

#[test]
fn test_partial_constructor_drops_empty() {
    assert_eq!(
        FieldUpdate::partial(Some(""), Some("N")),
        FieldUpdate::Partial {
            email: None,
            name: Some("N".to_string()),
        }
    );
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_preserves_order() {
    let mut collection = collection_with_two();
    collection.insert(Record::new(3, "c@x.com", "C")).unwrap();

    let removed = collection.remove(2).unwrap();

    assert_eq!(removed.id(), 2);
    assert_eq!(ids(&collection), vec![1, 3]);
}

#[test]
fn test_remove_twice() {
    let mut collection = collection_with_two();

    collection.remove(1).unwrap();
    let err = collection.remove(1).unwrap_err();

    assert!(matches!(err, StoreError::RecordNotFound { id: 1 }));
}

#[test]
fn test_remove_first_of_loaded_duplicates() {
    // Loaded snapshots are trusted, so duplicates can exist
    let mut collection = RecordCollection::from_records(vec![
        Record::new(1, "first@x.com", "First"),
        Record::new(1, "second@x.com", "Second"),
    ]);

    collection.remove(1).unwrap();

    assert_eq!(collection.get(1).unwrap().name, "Second");
}
