//! End-to-end pipeline tests: chunking, emission order, drivers

use std::io::{self, Cursor, Read};

use rsged::domain::{RecordTree, TreeData};
use rsged::stream::{from_file, parse_file, parse_str, GedReader, GedStream};
use rsged::util::testing::init_test_setup;
use rsged::GedError;
use serde_json::json;
use tempfile::TempDir;

const SAMPLE: &str = "\
0 HEAD\n\
1 SOUR rsged\n\
2 VERS 0.3.2\n\
1 CHAR UTF-8\n\
0 @I1@ INDI\n\
1 NAME John /Doe/\n\
2 GIVN John\n\
2 SURN Doe\n\
1 SEX M\n\
1 BIRT\n\
2 DATE 1 JAN 1900\n\
0 @F1@ FAM\n\
1 HUSB @I1@\n\
0 TRLR\n";

fn tree_values(trees: &[RecordTree]) -> serde_json::Value {
    let data: Vec<TreeData> = trees.iter().filter_map(RecordTree::to_data).collect();
    serde_json::to_value(data).unwrap()
}

fn parse_chunked(input: &str, chunk_len: usize) -> Vec<RecordTree> {
    let mut stream = GedStream::new();
    let mut trees = Vec::new();
    for chunk in input.as_bytes().chunks(chunk_len) {
        trees.extend(stream.feed(chunk));
    }
    trees.extend(stream.finish());
    trees
}

// ============================================================
// Worked examples
// ============================================================

#[test]
fn given_two_record_document_when_parsing_then_emits_both_trees() {
    init_test_setup();

    let trees = parse_str("0 HEAD\n1 SOUR Test\n0 TRLR\n");

    assert_eq!(
        tree_values(&trees),
        json!([
            {"level": 0, "tag": "HEAD", "children": [
                {"level": 1, "tag": "SOUR", "data": "Test"}
            ]},
            {"level": 0, "tag": "TRLR"}
        ])
    );
}

#[test]
fn given_pointer_record_when_parsing_then_tree_carries_pointer_without_delimiters() {
    let trees = parse_str("0 @I1@ INDI\n1 NAME John /Doe/\n1 SEX M\n");

    assert_eq!(
        tree_values(&trees),
        json!([
            {"level": 0, "pointer": "I1", "tag": "INDI", "children": [
                {"level": 1, "tag": "NAME", "data": "John /Doe/"},
                {"level": 1, "tag": "SEX", "data": "M"}
            ]}
        ])
    );
}

#[test]
fn given_blank_line_between_siblings_when_parsing_then_no_spurious_node() {
    let with_blank = parse_str("0 @I1@ INDI\n1 NAME John /Doe/\n\n1 SEX M\n");
    let without = parse_str("0 @I1@ INDI\n1 NAME John /Doe/\n1 SEX M\n");

    assert_eq!(tree_values(&with_blank), tree_values(&without));
}

// ============================================================
// Chunking idempotence
// ============================================================

#[test]
fn given_byte_by_byte_chunks_when_parsing_then_result_matches_single_chunk() {
    // Arrange
    let single = parse_str(SAMPLE);

    // Act
    let chunked = parse_chunked(SAMPLE, 1);

    // Assert
    assert_eq!(tree_values(&chunked), tree_values(&single));
}

#[test]
fn given_arbitrary_chunk_sizes_when_parsing_then_results_are_identical() {
    let single = tree_values(&parse_str(SAMPLE));

    for chunk_len in [2, 3, 5, 7, 11, 64] {
        let chunked = parse_chunked(SAMPLE, chunk_len);
        assert_eq!(tree_values(&chunked), single, "chunk_len {}", chunk_len);
    }
}

#[test]
fn given_multibyte_character_split_across_chunks_when_feeding_then_it_survives() {
    // Arrange: split inside the two-byte 'ü'
    let input = "0 NOTE z\u{fc}rich\n";
    let bytes = input.as_bytes();
    let split = input.find('\u{fc}').unwrap() + 1;

    // Act
    let mut stream = GedStream::new();
    let mut trees = stream.feed(&bytes[..split]);
    trees.extend(stream.feed(&bytes[split..]));
    trees.extend(stream.finish());

    // Assert
    let data = trees[0].to_data().unwrap();
    assert_eq!(data.data, "z\u{fc}rich");
}

#[test]
fn given_invalid_utf8_when_feeding_then_bytes_decode_lossily() {
    let mut stream = GedStream::new();
    let mut trees = stream.feed(b"0 NOTE \xff\n");
    trees.extend(stream.finish());

    let data = trees[0].to_data().unwrap();
    assert_eq!(data.data, "\u{fffd}");
}

// ============================================================
// Order, tolerance, flush
// ============================================================

#[test]
fn given_many_records_when_parsing_then_emission_preserves_input_order() {
    let input = "0 R1\n0 R2\n0 R3\n0 R4\n0 R5\n";

    let tags: Vec<Option<String>> = parse_str(input)
        .iter()
        .map(|tree| tree.root_tag().map(str::to_owned))
        .collect();

    assert_eq!(
        tags,
        ["R1", "R2", "R3", "R4", "R5"]
            .map(|t| Some(t.to_string()))
            .to_vec()
    );
}

#[test]
fn given_malformed_lines_sprinkled_in_when_parsing_then_trees_are_unchanged() {
    // Arrange: blank lines and grammar violations at record boundaries
    let noisy = "garbage\n0 HEAD\n1 SOUR Test\n\n@orphan@\n0 TRLR\n01 BAD\n";
    let clean = "0 HEAD\n1 SOUR Test\n0 TRLR\n";

    // Act
    let noisy_trees = parse_str(noisy);
    let clean_trees = parse_str(clean);

    // Assert
    assert_eq!(tree_values(&noisy_trees), tree_values(&clean_trees));
}

#[test]
fn given_document_without_trailing_newline_when_finishing_then_last_line_still_attaches() {
    let trees = parse_str("0 HEAD\n1 GEDC");

    assert_eq!(
        tree_values(&trees),
        json!([
            {"level": 0, "tag": "HEAD", "children": [{"level": 1, "tag": "GEDC"}]}
        ])
    );
}

#[test]
fn given_crlf_document_when_parsing_then_cr_never_reaches_values() {
    let trees = parse_str("0 HEAD\r\n1 SOUR Test\r\n0 TRLR\r\n");

    assert_eq!(
        tree_values(&trees),
        json!([
            {"level": 0, "tag": "HEAD", "children": [
                {"level": 1, "tag": "SOUR", "data": "Test"}
            ]},
            {"level": 0, "tag": "TRLR"}
        ])
    );
}

#[test]
fn given_emitted_trees_when_inspecting_then_child_levels_are_strictly_greater() {
    // includes a 0 -> 3 jump, which is passed through, not normalized
    let trees = parse_str("0 HEAD\n3 NOTE deep\n1 CHAR UTF-8\n0 TRLR\n");

    for tree in &trees {
        assert!(tree.is_finished());
        for (_, node) in tree.iter() {
            for &child_idx in &node.children {
                let child = tree.get_node(child_idx).unwrap();
                assert!(child.line.level > node.line.level);
            }
        }
    }
}

#[test]
fn given_dropped_stream_when_no_finish_is_called_then_in_progress_record_is_discarded() {
    // cancellation is just: stop feeding; only finish() flushes
    let mut stream = GedStream::new();
    let trees = stream.feed(b"0 HEAD\n1 SOUR Test\n");

    assert!(trees.is_empty());
    drop(stream);
}

// ============================================================
// Drivers
// ============================================================

#[test]
fn given_reader_when_iterating_then_trees_arrive_one_at_a_time_in_order() {
    let reader = GedReader::new(Cursor::new(SAMPLE.as_bytes()));

    let tags: Vec<String> = reader
        .map(|tree| tree.unwrap().root_tag().unwrap().to_string())
        .collect();

    assert_eq!(tags, vec!["HEAD", "INDI", "FAM", "TRLR"]);
}

#[test]
fn given_failing_reader_when_iterating_then_error_is_yielded_once_and_iteration_ends() {
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }
    }

    let mut reader = GedReader::new(FailingReader);

    assert!(matches!(
        reader.next(),
        Some(Err(GedError::FileReadError(_)))
    ));
    assert!(reader.next().is_none());
}

#[test]
fn given_file_on_disk_when_parsing_then_all_records_are_read() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("family.ged");
    std::fs::write(&path, SAMPLE).unwrap();

    // Act
    let trees = parse_file(&path).unwrap();

    // Assert
    assert_eq!(trees.len(), 4);
    assert_eq!(trees[1].root_tag(), Some("INDI"));
}

#[test]
fn given_missing_file_when_opening_then_file_not_found_is_reported() {
    let result = from_file(std::path::Path::new("/nonexistent/family.ged"));

    assert!(matches!(result, Err(GedError::FileNotFound(_))));
}

// ============================================================
// Serialization round-trip
// ============================================================

#[test]
fn given_exported_tree_when_round_tripping_through_json_then_nothing_is_lost() {
    let trees = parse_str(SAMPLE);
    let original: Vec<TreeData> = trees.iter().filter_map(RecordTree::to_data).collect();

    let encoded = serde_json::to_string(&original).unwrap();
    let decoded: Vec<TreeData> = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, original);
}
