//! Codec Tests
//!
//! Tests for snapshot text decoding and encoding.

use recordstore::codec::{decode, decode_bytes, encode, encode_record};
use recordstore::{Record, StoreError};

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_skips_blank_lines() {
    let text = "id=1,email=a@x.com,name=A\n\nid=2,email=b@x.com,name=B\n";

    let records = decode(text).unwrap();

    assert_eq!(
        records,
        vec![
            Record::new(1, "a@x.com", "A"),
            Record::new(2, "b@x.com", "B"),
        ]
    );
}

#[test]
fn test_decode_skips_whitespace_only_lines() {
    let text = "id=1,email=a@a.com,name=A\n\n   \n\t\nid=2,email=b@b.com,name=B\n";

    let records = decode(text).unwrap();

    assert_eq!(records.len(), 2);
}

#[test]
fn test_decode_malformed_line() {
    let text = "id=1,email=a@x.com,name=A\nBROKEN";

    match decode(text) {
        Err(StoreError::Format { line, content, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(content, "BROKEN");
        }
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_decode_any_key_order() {
    let records = decode("name=Bob,id=2,email=bob@example.com").unwrap();

    assert_eq!(records, vec![Record::new(2, "bob@example.com", "Bob")]);
}

#[test]
fn test_decode_duplicate_key_last_wins() {
    let records = decode("id=1,email=old@x.com,name=A,email=new@x.com").unwrap();

    assert_eq!(records[0].email, "new@x.com");
}

#[test]
fn test_decode_trims_keys_and_values() {
    let records = decode(" id = 5 , email = e@x.com ,name= E ").unwrap();

    assert_eq!(records, vec![Record::new(5, "e@x.com", "E")]);
}

#[test]
fn test_decode_crlf_line_endings() {
    let records = decode("id=1,email=a@x.com,name=A\r\nid=2,email=b@x.com,name=B\r\n").unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name, "B");
}

#[test]
fn test_decode_missing_id() {
    let err = decode("email=a@x.com,name=A").unwrap_err();
    assert!(matches!(err, StoreError::Format { line: 1, .. }));
}

#[test]
fn test_decode_non_integer_id() {
    let err = decode("id=abc,email=a@x.com,name=A").unwrap_err();
    match err {
        StoreError::Format { reason, .. } => assert!(reason.contains("not an integer")),
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_decode_missing_email_or_name() {
    assert!(matches!(
        decode("id=1,name=A"),
        Err(StoreError::Format { .. })
    ));
    assert!(matches!(
        decode("id=1,email=a@x.com"),
        Err(StoreError::Format { .. })
    ));
}

#[test]
fn test_decode_empty_values_are_present() {
    let records = decode("id=1,email=,name=").unwrap();

    assert_eq!(records, vec![Record::new(1, "", "")]);
}

#[test]
fn test_decode_does_not_check_uniqueness() {
    let records = decode("id=1,email=a@x.com,name=A\nid=1,email=b@x.com,name=B\n").unwrap();

    assert_eq!(records.len(), 2);
}

#[test]
fn test_decode_empty_input() {
    assert!(decode("").unwrap().is_empty());
    assert!(decode("\n\n  \n").unwrap().is_empty());
}

#[test]
fn test_decode_bytes_rejects_invalid_utf8() {
    let err = decode_bytes(&[0x69, 0x64, 0x3d, 0xff, 0xfe]).unwrap_err();

    assert!(matches!(err, StoreError::InvalidEncoding(_)));
}

#[test]
fn test_format_error_message() {
    let err = decode("garbage").unwrap_err();

    assert!(err.to_string().contains("Invalid record format in line 1"));
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_fixed_field_order() {
    let text = encode(&[
        Record::new(1, "a@x.com", "A"),
        Record::new(2, "b@x.com", "B"),
    ]);

    assert_eq!(text, "id=1,email=a@x.com,name=A\nid=2,email=b@x.com,name=B\n");
}

#[test]
fn test_encode_empty() {
    assert_eq!(encode(&[]), "");
}

#[test]
fn test_encode_record_single_line() {
    assert_eq!(
        encode_record(&Record::new(-3, "n@x.com", "Neg")),
        "id=-3,email=n@x.com,name=Neg\n"
    );
}

#[test]
fn test_encode_decode_preserves_order_and_values() {
    let records = vec![
        Record::new(10, "z@x.com", "Zed"),
        Record::new(2, "b@x.com", "Bee Bee"),
        Record::new(7, "a=b@x.com", ""),
    ];

    let decoded = decode(&encode(&records)).unwrap();

    assert_eq!(decoded, records);
}

#[test]
fn test_reencode_normalizes_layout() {
    let text = "name=A,id=1,email=a@x.com\n\n";

    let normalized = encode(&decode(text).unwrap());

    assert_eq!(normalized, "id=1,email=a@x.com,name=A\n");
}

#[test]
fn test_validated_records_survive_round_trip() {
    let records = vec![
        Record::validated(1, "a@x.com", "Ann Lee").unwrap(),
        Record::validated(2, "b@x.com", "").unwrap(),
    ];

    assert_eq!(decode(&encode(&records)).unwrap(), records);
    assert!(Record::validated(3, " c@x.com", "C ").is_err());
}
