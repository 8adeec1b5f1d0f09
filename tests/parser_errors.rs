// Unhappy paths through the loader: anything structurally wrong is MalformedSource.

use iso639_core::api::{parse_dataset, LoadOptions};
use iso639_core::error::{ParserError, RegistryError};

fn assert_malformed(source: &str) {
    let result = parse_dataset(source, "test.xml", LoadOptions::default());
    assert!(
        matches!(result, Err(RegistryError::MalformedSource(_))),
        "Should fail as malformed: {source}"
    );
}

#[test]
fn test_parser_error_empty_input() {
    assert_malformed("");
}

#[test]
fn test_parser_error_missing_root_close() {
    assert_malformed("<iso_639_3_entries>");
}

#[test]
fn test_parser_error_mismatched_close() {
    assert_malformed("<iso_639_3_entries></iso_639_3_entry>");
}

#[test]
fn test_parser_error_unterminated_attribute() {
    assert_malformed(r#"<iso_639_3_entries><iso_639_3_entry id="eng/></iso_639_3_entries>"#);
}

#[test]
fn test_parser_error_unterminated_comment() {
    assert_malformed("<iso_639_3_entries><!-- </iso_639_3_entries>");
}

#[test]
fn test_parser_error_missing_equals() {
    assert_malformed(r#"<iso_639_3_entries><iso_639_3_entry id "eng"/></iso_639_3_entries>"#);
}

#[test]
fn test_parser_error_unquoted_value() {
    assert_malformed(r#"<iso_639_3_entries><iso_639_3_entry id=eng/></iso_639_3_entries>"#);
}

#[test]
fn test_parser_error_text_content() {
    assert_malformed("<iso_639_3_entries>English</iso_639_3_entries>");
}

#[test]
fn test_parser_error_wrong_root() {
    assert_malformed("<languages></languages>");
}

#[test]
fn test_parser_error_unknown_entity() {
    assert_malformed(
        r#"<iso_639_3_entries>
            <iso_639_3_entry id="eng" scope="I" type="L" name="&eacute;"/>
        </iso_639_3_entries>"#,
    );
}

#[test]
fn test_parser_error_two_roots() {
    assert_malformed("<iso_639_3_entries/><iso_639_3_entries/>");
}

#[test]
fn test_empty_registry_is_valid() {
    let dataset =
        parse_dataset("<iso_639_3_entries/>", "empty.xml", LoadOptions::default()).unwrap();
    assert!(dataset.is_empty());
}

#[test]
fn test_parser_error_raw_less_than_in_attribute() {
    assert_malformed(
        r#"<iso_639_3_entries>
            <iso_639_3_entry id="eng" scope="I" type="L" name="Eng<lish"/>
        </iso_639_3_entries>"#,
    );
}

#[test]
fn test_parser_error_deeply_nested_elements() {
    let nested = "<a>".repeat(200_000);
    assert_malformed(&format!("<iso_639_3_entries>{nested}"));
    assert_malformed(&format!(
        r#"<iso_639_3_entries><iso_639_3_entry id="eng" scope="I" type="L" name="English">{nested}"#
    ));
}

#[test]
fn test_deep_nesting_reports_the_first_foreign_element() {
    let source = format!("<iso_639_3_entries>{}", "<a>".repeat(200_000));
    let err = parse_dataset(&source, "deep.xml", LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::MalformedSource(ParserError::UnexpectedElement { ref found, .. })
            if found == "a"
    ));
}
