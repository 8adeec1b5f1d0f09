//! Reads the registry XML file into raw, unvalidated entries.

use crate::error::{ParserError, RegistryError};
use crate::record::{Attribute, RawEntry};
use crate::utils::get_line_and_column;
use log::debug;
use miette::{NamedSource, SourceSpan};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use std::path::Path;

pub const ROOT_ELEMENT: &str = "iso_639_3_entries";
pub const ENTRY_ELEMENT: &str = "iso_639_3_entry";

/// Attributes every entry must carry for the file to count as well formed.
pub const REQUIRED_ATTRIBUTES: &[&str] = &["id", "name", "type", "scope"];

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// The parsed source file: entries in file order plus the text they were
/// read from, kept so later phases can point diagnostics into it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: NamedSource<String>,
    pub entries: Vec<RawEntry>,
}

/// Reads and parses the registry file at `path`.
///
/// # Errors
/// Returns `RegistryError::Io` if the file cannot be read and
/// `RegistryError::MalformedSource` if it is not a well-formed registry document.
pub fn load_path(path: impl AsRef<Path>) -> Result<RawDocument, RegistryError> {
    let path = path.as_ref();
    debug!("reading registry file {}", path.display());
    let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(load_str(&source, &path.to_string_lossy())?)
}

/// Parses registry XML held in memory. `name` labels the source in diagnostics.
///
/// A leading byte order mark is skipped; spans still count it, so they index
/// into `source` as given.
///
/// # Errors
/// Returns a `ParserError` if the text is not a well-formed registry document.
pub fn load_str(source: &str, name: &str) -> Result<RawDocument, ParserError> {
    let named_source = NamedSource::new(name, source.to_string());
    let entries = DocumentReader::new(source, &named_source).read()?;
    debug!("parsed {} entries from {}", entries.len(), name);
    Ok(RawDocument {
        source: named_source,
        entries,
    })
}

/// Where the reader stands in the fixed `root > entry` layout. Nothing may
/// nest below an entry, so the depth never exceeds two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Prolog,
    InRoot,
    /// Inside an entry written with an explicit end tag.
    InEntry,
    Epilog,
}

struct DocumentReader<'a> {
    input: &'a str,
    /// Bytes skipped before the XML reader starts.
    offset: usize,
    source: &'a NamedSource<String>,
}

impl<'a> DocumentReader<'a> {
    fn new(input: &'a str, source: &'a NamedSource<String>) -> Self {
        let offset = if input.starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len_utf8()
        } else {
            0
        };
        DocumentReader {
            input,
            offset,
            source,
        }
    }

    fn read(&self) -> Result<Vec<RawEntry>, ParserError> {
        let mut reader = Reader::from_str(&self.input[self.offset..]);
        let mut position = Position::Prolog;
        let mut entries = Vec::new();

        loop {
            let start = self.offset + reader.buffer_position() as usize;
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(error) => {
                    let at = self.offset + reader.buffer_position() as usize;
                    return Err(self.syntax(error, at));
                }
            };
            let end = self.offset + reader.buffer_position() as usize;
            let span = SourceSpan::from((start, end - start));

            match event {
                Event::Start(tag) => {
                    position = self.open(position, &tag, span, false, &mut entries)?;
                }
                Event::Empty(tag) => {
                    position = self.open(position, &tag, span, true, &mut entries)?;
                }
                Event::End(_) => {
                    position = match position {
                        Position::InEntry => Position::InRoot,
                        Position::InRoot => Position::Epilog,
                        // The reader already rejects end tags with nothing open.
                        Position::Prolog | Position::Epilog => {
                            return Err(self.syntax("unmatched end tag", start));
                        }
                    };
                }
                Event::Text(text) => {
                    if !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(self.stray_text(span));
                    }
                }
                Event::CData(_) => return Err(self.stray_text(span)),
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => {
                    if position == Position::Epilog {
                        return Ok(entries);
                    }
                    return Err(ParserError::UnexpectedEof {
                        src: self.source.clone(),
                        span: (self.input.len(), 0).into(),
                    });
                }
            }
        }
    }

    fn open(
        &self,
        position: Position,
        tag: &BytesStart<'_>,
        span: SourceSpan,
        empty: bool,
        entries: &mut Vec<RawEntry>,
    ) -> Result<Position, ParserError> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        match position {
            Position::Prolog => {
                if name != ROOT_ELEMENT {
                    return Err(ParserError::UnexpectedRoot {
                        src: self.source.clone(),
                        span,
                        expected: ROOT_ELEMENT.to_string(),
                        found: name,
                    });
                }
                Ok(if empty {
                    Position::Epilog
                } else {
                    Position::InRoot
                })
            }
            Position::InRoot => {
                if name != ENTRY_ELEMENT {
                    return Err(ParserError::UnexpectedElement {
                        src: self.source.clone(),
                        span,
                        parent: ROOT_ELEMENT.to_string(),
                        expected: format!("<{ENTRY_ELEMENT}>"),
                        found: name,
                    });
                }
                entries.push(self.entry(tag, span)?);
                Ok(if empty {
                    Position::InRoot
                } else {
                    Position::InEntry
                })
            }
            Position::InEntry => Err(ParserError::UnexpectedElement {
                src: self.source.clone(),
                span,
                parent: ENTRY_ELEMENT.to_string(),
                expected: "an empty element".to_string(),
                found: name,
            }),
            Position::Epilog => Err(ParserError::TrailingContent {
                src: self.source.clone(),
                span,
            }),
        }
    }

    fn entry(&self, tag: &BytesStart<'_>, span: SourceSpan) -> Result<RawEntry, ParserError> {
        let mut attributes: Vec<Attribute> = Vec::new();

        // Duplicates are reported below, with a span on the repeated name.
        let mut parsed = tag.attributes();
        parsed.with_checks(false);

        for attribute in parsed {
            let attribute = attribute.map_err(|e| self.syntax(e, span.offset()))?;
            let key: &[u8] = attribute.key.as_ref();
            let raw: &[u8] = &attribute.value;
            let name = String::from_utf8_lossy(key).into_owned();

            let key_start = self.offset_of(key).unwrap_or(span.offset());
            let value_start = self.offset_of(raw).unwrap_or(span.offset());
            let value_span = SourceSpan::from((value_start, raw.len()));

            if attributes.iter().any(|a| a.name == name) {
                return Err(ParserError::DuplicateAttribute {
                    src: self.source.clone(),
                    span: (key_start, key.len()).into(),
                    attribute: name,
                });
            }
            if raw.contains(&b'<') {
                return Err(ParserError::IllegalCharacter {
                    src: self.source.clone(),
                    span: value_span,
                    attribute: name,
                });
            }
            let value = match attribute.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(error) => {
                    return Err(ParserError::InvalidEntity {
                        src: self.source.clone(),
                        span: value_span,
                        attribute: name,
                        reason: error.to_string(),
                    })
                }
            };

            attributes.push(Attribute {
                name,
                value,
                pos_start: key_start,
                // Past the closing quote.
                pos_end: value_start + raw.len() + 1,
                value_start,
                value_end: value_start + raw.len(),
            });
        }

        for required in REQUIRED_ATTRIBUTES {
            if !attributes.iter().any(|a| a.name == *required) {
                if log::log_enabled!(log::Level::Debug) {
                    let (line, column) = get_line_and_column(self.input, span.offset());
                    debug!("entry at {line}:{column} has no `{required}` attribute");
                }
                return Err(ParserError::MissingAttribute {
                    src: self.source.clone(),
                    span,
                    attribute: (*required).to_string(),
                });
            }
        }

        Ok(RawEntry {
            attributes,
            pos_start: span.offset(),
            pos_end: span.offset() + span.len(),
        })
    }

    /// Byte offset of `part` in the input. The reader hands out slices of the
    /// input itself, so this is plain pointer distance.
    fn offset_of(&self, part: &[u8]) -> Option<usize> {
        let base = self.input.as_ptr() as usize;
        let at = part.as_ptr() as usize;
        (at >= base && at + part.len() <= base + self.input.len()).then(|| at - base)
    }

    fn syntax(&self, error: impl Display, at: usize) -> ParserError {
        ParserError::Syntax {
            src: self.source.clone(),
            span: (at.min(self.input.len()), 0).into(),
            message: error.to_string(),
        }
    }

    fn stray_text(&self, span: SourceSpan) -> ParserError {
        ParserError::StrayText {
            src: self.source.clone(),
            span,
        }
    }
}
