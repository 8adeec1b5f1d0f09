use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for every registry operation.
///
/// A failed load never yields a usable dataset: any variant returned from
/// [`crate::api::load_dataset`] is terminal for that attempt.
#[derive(Error, Debug, Diagnostic)]
pub enum RegistryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedSource(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("{} validation error(s) in registry data", .errors.len())]
    #[diagnostic(
        code(validator::report),
        help("Fix every listed entry in the source file and load it again.")
    )]
    ValidationReport {
        #[related]
        errors: Vec<ValidationError>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error("Could not read {}", .path.display())]
    #[diagnostic(code(loader::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The source text could not be parsed as a registry document.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Malformed XML: {message}")]
    #[diagnostic(code(parser::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("Here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected end of file")]
    #[diagnostic(
        code(parser::unexpected_eof),
        help("The file ended before every element was closed.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("File ended unexpectedly here")]
        span: SourceSpan,
    },

    #[error("Expected root element <{expected}>, found <{found}>")]
    #[diagnostic(code(parser::unexpected_root))]
    UnexpectedRoot {
        #[source_code]
        src: NamedSource<String>,
        #[label("Root element")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("Unexpected element <{found}> inside <{parent}>")]
    #[diagnostic(code(parser::unexpected_element))]
    UnexpectedElement {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected}")]
        span: SourceSpan,
        parent: String,
        expected: String,
        found: String,
    },

    #[error("Content after the root element")]
    #[diagnostic(
        code(parser::trailing_content),
        help("A registry file holds exactly one root element.")
    )]
    TrailingContent {
        #[source_code]
        src: NamedSource<String>,
        #[label("Found after the root was closed")]
        span: SourceSpan,
    },

    #[error("Unexpected text content")]
    #[diagnostic(
        code(parser::stray_text),
        help("Registry entries carry their data in attributes; character data is not allowed.")
    )]
    StrayText {
        #[source_code]
        src: NamedSource<String>,
        #[label("Text found here")]
        span: SourceSpan,
    },

    #[error("Entry is missing required attribute `{attribute}`")]
    #[diagnostic(code(parser::missing_attribute))]
    MissingAttribute {
        #[source_code]
        src: NamedSource<String>,
        #[label("This entry has no `{attribute}`")]
        span: SourceSpan,
        attribute: String,
    },

    #[error("Attribute `{attribute}` is given more than once")]
    #[diagnostic(code(parser::duplicate_attribute))]
    DuplicateAttribute {
        #[source_code]
        src: NamedSource<String>,
        #[label("Repeated here")]
        span: SourceSpan,
        attribute: String,
    },

    #[error("Attribute `{attribute}` contains a raw `<`")]
    #[diagnostic(
        code(parser::illegal_character),
        help("Write `&lt;` for a literal `<` inside an attribute value.")
    )]
    IllegalCharacter {
        #[source_code]
        src: NamedSource<String>,
        #[label("Not allowed in an attribute value")]
        span: SourceSpan,
        attribute: String,
    },

    #[error("Invalid entity reference in `{attribute}`: {reason}")]
    #[diagnostic(
        code(parser::invalid_entity),
        help("Only the predefined XML entities and numeric character references are supported.")
    )]
    InvalidEntity {
        #[source_code]
        src: NamedSource<String>,
        #[label("In this value")]
        span: SourceSpan,
        attribute: String,
        reason: String,
    },
}

/// A single entry violates one of the registry invariants.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ValidationError {
    #[error("Invalid language code `{code}`")]
    #[diagnostic(
        code(validator::invalid_code_format),
        help("ISO 639-3 codes are exactly three lowercase ASCII letters.")
    )]
    InvalidCodeFormat {
        code: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("Malformed code")]
        span: SourceSpan,
    },

    #[error("Invalid value `{value}` for field `{field}` of entry `{code}`")]
    #[diagnostic(code(validator::invalid_field_value))]
    InvalidFieldValue {
        field: String,
        value: String,
        code: String,
        allowed: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {allowed}")]
        span: SourceSpan,
    },

    #[error("Duplicate {field} `{code}`")]
    #[diagnostic(
        code(validator::duplicate_code),
        help("Every identifier must belong to exactly one registry entry.")
    )]
    DuplicateCode {
        field: String,
        code: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("Defined again here")]
        span: SourceSpan,
        #[label("First defined here")]
        first: SourceSpan,
    },
}

impl ValidationError {
    /// The registry code of the entry this error is about.
    #[must_use]
    pub fn entry_code(&self) -> &str {
        match self {
            ValidationError::InvalidCodeFormat { code, .. }
            | ValidationError::InvalidFieldValue { code, .. }
            | ValidationError::DuplicateCode { code, .. } => code,
        }
    }
}

/// Export failures. Never leaves a partially written output file behind.
#[derive(Error, Debug, Diagnostic)]
pub enum ExportError {
    #[error("Unsupported export format `{format}`")]
    #[diagnostic(
        code(export::unsupported_format),
        help("Supported formats are: rust, json, yaml.")
    )]
    UnsupportedFormat { format: String },

    #[error("Could not write {}", .path.display())]
    #[diagnostic(code(export::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize dataset as {format}: {message}")]
    #[diagnostic(code(export::serialize))]
    Serialize { format: String, message: String },
}
