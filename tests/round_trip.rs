use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use taskline::model::Priority;
use taskline::parse::{FormatError, decode_all, encode_all};

fn read_fixture(fixture_name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", fixture_name, e))
}

fn encode_file(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[test]
fn round_trip_current_format() {
    let source = read_fixture("current.txt");
    let (tasks, dropped) = decode_all(source.lines());

    assert!(dropped.is_empty(), "unexpected dropped lines: {:?}", dropped);
    assert_eq!(tasks.len(), 5);
    assert_eq!(encode_file(encode_all(&tasks)), source);
}

#[test]
fn legacy_lines_upgrade_to_medium_priority() {
    let source = read_fixture("legacy.txt");
    let (tasks, dropped) = decode_all(source.lines());

    assert!(dropped.is_empty());
    assert!(tasks.iter().all(|t| t.priority() == Priority::Medium));
    assert_eq!(
        encode_file(encode_all(&tasks)),
        "\
T | 1 | 1 | read book
D | 0 | 1 | return book | 2019-12-02 1800
E | 1 | 1 | project meeting | 2019-12-01 0900 | 2019-12-01 1100
"
    );

    // A second pass is stable
    let upgraded = encode_file(encode_all(&tasks));
    let (again, _) = decode_all(upgraded.lines());
    assert_eq!(encode_file(encode_all(&again)), upgraded);
}

#[test]
fn corrupt_lines_are_skipped_individually() {
    let source = read_fixture("mixed_corrupt.txt");
    let (tasks, dropped) = decode_all(source.lines());

    assert_eq!(
        tasks.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        vec![
            "[T][ ] pay rent #high".to_string(),
            "[E][X] conference #low (from: Dec 01 2019, 9:00AM to: Dec 03 2019, 5:00PM)"
                .to_string(),
        ]
    );

    let line_numbers: Vec<usize> = dropped.iter().map(|d| d.line_no).collect();
    assert_eq!(line_numbers, vec![2, 4, 5, 6, 7, 8, 9]);

    assert_eq!(dropped[0].error, FormatError::TooFewFields(1));
    assert_eq!(dropped[1].error, FormatError::UnknownType("X".to_string()));
    assert!(matches!(dropped[4].error, FormatError::Invalid(_)));
    assert_eq!(dropped[5].error, FormatError::InvalidDoneFlag("7".to_string()));
    assert_eq!(dropped[6].error, FormatError::InvalidPriority("9".to_string()));
    assert_eq!(dropped[1].text, "X | 0 | 1 | unknown type");
}
