//! Tests for Sequence serialization
//!
//! These tests verify:
//! - Byte layout of written sequences
//! - write/read round trips, including nested sequences
//! - Partial reads keep exactly the decoded prefix
//! - Rejected counts (sentinel, unallocatable)

use std::io::{self, Cursor, Write};

use seqstore::codec::{to_bytes, Decode, Encode};
use seqstore::model::Article;
use seqstore::{SeqError, Sequence, INVALID_INDEX};

// =============================================================================
// Helper Functions
// =============================================================================

fn articles() -> Vec<Article> {
    vec![
        Article::new("Aspirin 500mg", 399).with_stock(120),
        Article::new("Bandages", 250).with_stock(40),
        Article::new("Cough syrup", 725).with_stock(0),
    ]
}

fn read_back<T: Decode>(bytes: Vec<u8>) -> Sequence<T> {
    let mut seq = Sequence::new();
    seq.read(&mut Cursor::new(bytes)).unwrap();
    seq
}

/// Writer that fails once `budget` bytes have been accepted
struct FailingWriter {
    budget: usize,
    written: Vec<u8>,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.budget {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_empty_sequence_is_just_a_count() {
    let seq: Sequence<u64> = Sequence::new();
    let mut bytes = Vec::new();
    seq.write(&mut bytes).unwrap();
    assert_eq!(bytes, 0u64.to_le_bytes());
}

#[test]
fn test_integer_sequence_layout() {
    let seq: Sequence<u64> = [1, 2].into_iter().collect();
    let mut bytes = Vec::new();
    seq.write(&mut bytes).unwrap();

    let mut expected = 2u64.to_le_bytes().to_vec();
    expected.extend_from_slice(&1u64.to_le_bytes());
    expected.extend_from_slice(&2u64.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_layout_is_count_then_element_encodings() {
    let seq: Sequence<Article> = articles().into_iter().collect();
    let mut bytes = Vec::new();
    seq.write(&mut bytes).unwrap();

    let mut expected = 3u64.to_le_bytes().to_vec();
    for article in articles() {
        expected.extend(to_bytes(&article).unwrap());
    }
    assert_eq!(bytes, expected);
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_empty_single_many() {
    for count in [0usize, 1, 3] {
        let seq: Sequence<Article> = articles().into_iter().take(count).collect();
        let mut bytes = Vec::new();
        seq.write(&mut bytes).unwrap();

        let decoded: Sequence<Article> = read_back(bytes);
        assert_eq!(decoded, seq, "round trip of {} articles", count);
    }
}

#[test]
fn test_pop_at_then_round_trip() {
    let mut seq: Sequence<Article> = Sequence::new();
    for article in articles() {
        seq.push(article).unwrap();
    }

    let removed = seq.pop_at(1);
    assert_eq!(removed.name, "Bandages");
    assert_eq!(seq.len(), 2);

    let mut bytes = Vec::new();
    seq.write(&mut bytes).unwrap();
    let decoded: Sequence<Article> = read_back(bytes);

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0], articles()[0]);
    assert_eq!(decoded[1], articles()[2]);
}

#[test]
fn test_read_reserves_exact_count() {
    let seq: Sequence<u64> = (0..11).collect();
    let mut bytes = Vec::new();
    seq.write(&mut bytes).unwrap();

    let decoded: Sequence<u64> = read_back(bytes);
    assert_eq!(decoded.capacity(), 11);
    assert_eq!(decoded, seq);
}

#[test]
fn test_nested_sequences_round_trip() {
    let mut outer: Sequence<Sequence<String>> = Sequence::new();
    outer.push(Sequence::new()).unwrap();
    outer
        .push(["x", "yz"].iter().map(|s| s.to_string()).collect())
        .unwrap();
    outer.push(["only"].iter().map(|s| s.to_string()).collect()).unwrap();

    let bytes = to_bytes(&outer).unwrap();
    let decoded = Sequence::<Sequence<String>>::decode(&mut bytes.as_slice()).unwrap();

    assert_eq!(decoded, outer);
    assert!(decoded[0].is_empty());
    assert_eq!(decoded[1][1], "yz");
}

#[test]
fn test_read_replaces_existing_contents() {
    let source: Sequence<u64> = [7, 8].into_iter().collect();
    let mut bytes = Vec::new();
    source.write(&mut bytes).unwrap();

    let mut target: Sequence<u64> = (0..20).collect();
    target.read(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(target.as_slice(), &[7, 8]);
}

#[test]
fn test_back_to_back_sequences_in_one_stream() {
    let first: Sequence<u64> = [1, 2, 3].into_iter().collect();
    let second: Sequence<String> = ["a"].iter().map(|s| s.to_string()).collect();

    let mut bytes = Vec::new();
    first.write(&mut bytes).unwrap();
    second.write(&mut bytes).unwrap();

    let mut cursor = Cursor::new(bytes);
    let mut a: Sequence<u64> = Sequence::new();
    let mut b: Sequence<String> = Sequence::new();
    a.read(&mut cursor).unwrap();
    b.read(&mut cursor).unwrap();

    assert_eq!(a, first);
    assert_eq!(b, second);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_partial_read_keeps_decoded_prefix() {
    // Count claims 5 elements but only 2 valid encodings follow
    let mut bytes = 5u64.to_le_bytes().to_vec();
    "first".to_string().encode(&mut bytes).unwrap();
    "second".to_string().encode(&mut bytes).unwrap();
    bytes.extend_from_slice(&2u64.to_le_bytes());
    bytes.extend_from_slice(&[0xFF, 0xFE]);

    let mut seq: Sequence<String> = Sequence::new();
    let err = seq.read(&mut Cursor::new(bytes)).unwrap_err();

    assert_eq!(seq.len(), 2);
    assert_eq!(seq[0], "first");
    assert_eq!(seq[1], "second");
    assert_eq!(err.decoded_count(), Some(2));
    match err {
        SeqError::PartialRead {
            decoded, expected, ..
        } => {
            assert_eq!(decoded, 2);
            assert_eq!(expected, 5);
        }
        other => panic!("Expected PartialRead, got {:?}", other),
    }
}

#[test]
fn test_truncated_stream_is_partial_read() {
    let seq: Sequence<u64> = (0..4).collect();
    let mut bytes = Vec::new();
    seq.write(&mut bytes).unwrap();
    bytes.truncate(8 + 8 * 3 + 4);

    let mut decoded: Sequence<u64> = Sequence::new();
    let err = decoded.read(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.decoded_count(), Some(3));
    assert_eq!(decoded.as_slice(), &[0, 1, 2]);
}

#[test]
fn test_missing_count_is_io_error() {
    let mut seq: Sequence<u64> = Sequence::new();
    let err = seq.read(&mut Cursor::new(vec![1, 2, 3])).unwrap_err();
    assert!(matches!(err, SeqError::Io(_)));
    assert!(seq.is_empty());
}

#[test]
fn test_sentinel_count_is_rejected() {
    let bytes = INVALID_INDEX.to_le_bytes().to_vec();
    let mut seq: Sequence<u64> = Sequence::new();
    let err = seq.read(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, SeqError::Corrupt(_)));
}

#[test]
fn test_unallocatable_count_fails_before_decoding() {
    let bytes = (u64::MAX / 2).to_le_bytes().to_vec();
    let mut seq: Sequence<u64> = Sequence::new();
    let err = seq.read(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, SeqError::Allocation { .. }));
    assert_eq!(seq.len(), 0);
}

#[test]
fn test_count_beyond_limit_fails() {
    let source: Sequence<u64> = (0..10).collect();
    let mut bytes = Vec::new();
    source.write(&mut bytes).unwrap();

    let mut limited: Sequence<u64> = Sequence::with_limit(4);
    let err = limited.read(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, SeqError::Allocation { requested: 10 }));
}

#[test]
fn test_write_failure_stops_immediately() {
    let seq: Sequence<u64> = (0..4).collect();
    let mut writer = FailingWriter {
        budget: 8 + 8 * 2,
        written: Vec::new(),
    };

    let err = seq.write(&mut writer).unwrap_err();
    assert!(matches!(err, SeqError::Io(_)));
    assert_eq!(writer.written.len(), 8 + 8 * 2);
}
