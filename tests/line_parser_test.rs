//! Tests for the GEDCOM line grammar

use rsged::domain::LineParser;
use rstest::rstest;

// ============================================================
// Accepted lines
// ============================================================

#[rstest]
#[case("0 HEAD", 0, "HEAD")]
#[case("1 SOUR Test", 1, "SOUR")]
#[case("2 DATE 12 JAN 1900", 2, "DATE")]
#[case("10 _CUSTOM x", 10, "_CUSTOM")]
#[case("0  HEAD", 0, "HEAD")]
#[case("  1 CONT indented", 1, "CONT")]
#[case("\t1 CONC tabbed", 1, "CONC")]
fn given_valid_line_when_parsing_then_extracts_level_and_tag(
    #[case] input: &str,
    #[case] level: u32,
    #[case] tag: &str,
) {
    let parser = LineParser::new();

    let line = parser.parse(input).expect("line should match the grammar");

    assert_eq!(line.level, level);
    assert_eq!(line.tag, tag);
}

#[test]
fn given_pointer_line_when_parsing_then_strips_delimiters() {
    // Arrange
    let parser = LineParser::new();

    // Act
    let line = parser.parse("0 @I1@ INDI").unwrap();

    // Assert
    assert_eq!(line.level, 0);
    assert_eq!(line.pointer.as_deref(), Some("I1"));
    assert_eq!(line.tag, "INDI");
    assert_eq!(line.data, "");
}

#[test]
fn given_value_with_internal_spaces_when_parsing_then_captures_verbatim() {
    let parser = LineParser::new();

    let line = parser.parse("1 NAME John /Doe/").unwrap();

    assert_eq!(line.tag, "NAME");
    assert_eq!(line.data, "John /Doe/");
}

#[test]
fn given_value_with_extra_leading_space_when_parsing_then_keeps_it() {
    // only the single delimiter space is consumed, the rest is payload
    let parser = LineParser::new();

    let line = parser.parse("1 NOTE  padded").unwrap();

    assert_eq!(line.data, " padded");
}

#[test]
fn given_empty_value_and_absent_value_when_parsing_then_both_normalize_to_empty() {
    let parser = LineParser::new();

    let absent = parser.parse("0 TRLR").unwrap();
    let empty = parser.parse("1 NOTE ").unwrap();

    assert_eq!(absent.data, "");
    assert_eq!(empty.data, "");
}

#[test]
fn given_carriage_return_terminated_line_when_parsing_then_cr_stays_out_of_value() {
    let parser = LineParser::new();

    let bare = parser.parse("0 TRLR\r").unwrap();
    let valued = parser.parse("1 SOUR Test\r").unwrap();

    assert_eq!(bare.tag, "TRLR");
    assert_eq!(bare.data, "");
    assert_eq!(valued.data, "Test");
}

// ============================================================
// Rejected lines
// ============================================================

#[rstest]
#[case("")]
#[case("   ")]
#[case("01 TAG")] // leading zero in level
#[case("0")] // no tag
#[case("0 ")] // no tag
#[case("ABC")]
#[case("-1 TAG")]
#[case("0   HEAD")] // three spaces between level and tag
#[case("0\tHEAD")] // tab is not a valid separator
#[case("0 @I1@INDI")] // pointer without its trailing space
#[case("x 0 HEAD")] // grammar is anchored at line start
#[case("4294967296 TAG")] // level beyond u32 range is rejected, not saturated
fn given_malformed_line_when_parsing_then_rejects(#[case] input: &str) {
    let parser = LineParser::new();

    assert!(parser.parse(input).is_none(), "should reject {:?}", input);
}
