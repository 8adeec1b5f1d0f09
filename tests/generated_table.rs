// The Rust table export is meant to be compiled into other crates. This file
// includes a checked-in rendering of `fixtures/two_languages.xml` and checks
// both that it builds and that the exporter still produces it byte for byte.

use iso639_core::api::{load_dataset, LoadOptions};
use iso639_core::export::render;
use std::path::PathBuf;

#[allow(dead_code)]
mod table {
    include!("fixtures/two_languages.rs");
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_included_table_indexes_agree_with_records() {
    assert_eq!(table::LANGUAGES.len(), 2);
    assert_eq!(table::BY_CODE.len(), table::LANGUAGES.len());

    for (code, position) in table::BY_CODE {
        assert_eq!(table::LANGUAGES[position].code, code);
    }
    for (name, positions) in table::BY_NAME {
        for &position in positions {
            assert_eq!(table::LANGUAGES[position].reference_name, name);
        }
    }

    let codes: Vec<_> = table::BY_CODE.iter().map(|(code, _)| *code).collect();
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted);
}

#[test]
fn test_included_table_supports_binary_search() {
    let position = table::BY_CODE
        .binary_search_by(|(code, _)| code.cmp(&"fra"))
        .map(|i| table::BY_CODE[i].1)
        .unwrap();
    let french = table::LANGUAGES[position];
    assert_eq!(french.reference_name, "French");
    assert_eq!(french.part1_code, Some("fr"));
    assert_eq!(french.inverted_name, None);

    assert!(table::BY_CODE
        .binary_search_by(|(code, _)| code.cmp(&"xyz"))
        .is_err());
}

#[test]
fn test_exporter_output_matches_checked_in_table() {
    let dataset = load_dataset(fixture("two_languages.xml"), LoadOptions::default()).unwrap();
    let rendered = render(&dataset, "rust").unwrap();
    let expected = include_str!("fixtures/two_languages.rs");
    assert_eq!(
        rendered, expected,
        "the Rust table layout changed; regenerate tests/fixtures/two_languages.rs \
         with `iso639 export tests/fixtures/two_languages.xml --format rust`"
    );
}
