use crate::error::{RegistryError, ValidationError};
use crate::loader::RawDocument;
use crate::record::{
    Attribute, LanguageRecord, LanguageScope, LanguageType, RawEntry, RegistryEnum,
};
use crate::utils::is_lower_alpha;
use log::{debug, warn};
use miette::{NamedSource, SourceSpan};
use std::collections::HashMap;

/// Attributes the validator understands. Anything else is dropped.
const KNOWN_ATTRIBUTES: &[&str] = &[
    "id",
    "reference_name",
    "type",
    "scope",
    "name",
    "inverted_name",
    "common_name",
    "part1_code",
    "part2_code",
];

/// How the validator reacts to the first violation it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Stop at the first violation and return it.
    #[default]
    Strict,
    /// Check every entry and fail once with the full list of violations.
    Report,
}

pub struct Validator {
    mode: ValidationMode,
    source: NamedSource<String>,
    // First-seen span for each identifier, keyed by field name.
    seen: HashMap<&'static str, HashMap<String, SourceSpan>>,
    errors: Vec<ValidationError>,
}

impl Validator {
    pub fn new(mode: ValidationMode, source: NamedSource<String>) -> Self {
        Validator {
            mode,
            source,
            seen: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Converts every raw entry into a `LanguageRecord`, enforcing the
    /// registry invariants.
    ///
    /// # Errors
    /// In strict mode, the first violation as `RegistryError::Validation`.
    /// In report mode, all violations as `RegistryError::ValidationReport`.
    pub fn validate(
        mut self,
        entries: Vec<RawEntry>,
    ) -> Result<Vec<LanguageRecord>, RegistryError> {
        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.validate_entry(entry) {
                Ok(record) => records.push(record),
                Err(error) if self.mode == ValidationMode::Strict => return Err(error.into()),
                Err(error) => self.errors.push(error),
            }
        }

        if self.errors.is_empty() {
            debug!("validated {} records", records.len());
            Ok(records)
        } else {
            warn!("{} invalid entries in {}", self.errors.len(), self.source.name());
            Err(RegistryError::ValidationReport {
                errors: self.errors,
            })
        }
    }

    fn validate_entry(&mut self, entry: RawEntry) -> Result<LanguageRecord, ValidationError> {
        let id = self.required(&entry, "id")?;
        let code = id.value.clone();
        if !is_lower_alpha(&code, 3) {
            return Err(ValidationError::InvalidCodeFormat {
                code,
                src: self.source.clone(),
                span: value_span(id),
            });
        }

        let language_type = self.enumerated::<LanguageType>(&entry, &code)?;
        let scope = self.enumerated::<LanguageScope>(&entry, &code)?;
        let part1_code = self.optional_code(&entry, "part1_code", 2, &code)?;
        let part2_code = self.optional_code(&entry, "part2_code", 3, &code)?;
        let name = self.text(&entry, "name", &code)?;
        let reference_name = match entry.get("reference_name") {
            Some(_) => self.text(&entry, "reference_name", &code)?,
            None => name.clone(),
        };

        for attribute in &entry.attributes {
            if !KNOWN_ATTRIBUTES.contains(&attribute.name.as_str()) {
                debug!(
                    "ignoring unknown attribute `{}` on entry `{code}`",
                    attribute.name
                );
            }
        }

        // Uniqueness is checked last so an entry that fails another check
        // does not claim its identifiers.
        self.claim("language code", &code, value_span(id))?;
        if let Some(part1) = &part1_code {
            let span = span_of(&entry, "part1_code");
            self.claim("part1_code", part1, span)?;
        }
        if let Some(part2) = &part2_code {
            let span = span_of(&entry, "part2_code");
            self.claim("part2_code", part2, span)?;
        }

        Ok(LanguageRecord {
            code,
            reference_name,
            language_type,
            scope,
            name,
            inverted_name: entry.value("inverted_name").map(str::to_string),
            common_name: entry.value("common_name").map(str::to_string),
            part1_code,
            part2_code,
        })
    }

    fn required<'e>(
        &self,
        entry: &'e RawEntry,
        name: &str,
    ) -> Result<&'e Attribute, ValidationError> {
        // The loader guarantees required attributes, but an entry built by
        // hand may still lack one; report it against the whole element.
        entry.get(name).ok_or_else(|| ValidationError::InvalidFieldValue {
            field: name.to_string(),
            value: String::new(),
            code: entry.value("id").unwrap_or_default().to_string(),
            allowed: "a non-empty value".to_string(),
            src: self.source.clone(),
            span: (entry.pos_start, entry.pos_end - entry.pos_start).into(),
        })
    }

    fn text(&self, entry: &RawEntry, field: &str, code: &str) -> Result<String, ValidationError> {
        let attribute = self.required(entry, field)?;
        if attribute.value.trim().is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: field.to_string(),
                value: attribute.value.clone(),
                code: code.to_string(),
                allowed: "a non-empty value".to_string(),
                src: self.source.clone(),
                span: value_span(attribute),
            });
        }
        Ok(attribute.value.clone())
    }

    fn enumerated<E: RegistryEnum>(
        &self,
        entry: &RawEntry,
        code: &str,
    ) -> Result<E, ValidationError> {
        let attribute = self.required(entry, E::FIELD)?;
        E::from_letter(&attribute.value).ok_or_else(|| ValidationError::InvalidFieldValue {
            field: E::FIELD.to_string(),
            value: attribute.value.clone(),
            code: code.to_string(),
            allowed: E::allowed(),
            src: self.source.clone(),
            span: value_span(attribute),
        })
    }

    fn optional_code(
        &self,
        entry: &RawEntry,
        field: &str,
        len: usize,
        code: &str,
    ) -> Result<Option<String>, ValidationError> {
        let Some(attribute) = entry.get(field) else {
            return Ok(None);
        };
        if is_lower_alpha(&attribute.value, len) {
            Ok(Some(attribute.value.clone()))
        } else {
            Err(ValidationError::InvalidFieldValue {
                field: field.to_string(),
                value: attribute.value.clone(),
                code: code.to_string(),
                allowed: format!("{len} lowercase ASCII letters"),
                src: self.source.clone(),
                span: value_span(attribute),
            })
        }
    }

    fn claim(
        &mut self,
        field: &'static str,
        value: &str,
        span: SourceSpan,
    ) -> Result<(), ValidationError> {
        let seen = self.seen.entry(field).or_default();
        if let Some(first) = seen.get(value) {
            return Err(ValidationError::DuplicateCode {
                field: field.to_string(),
                code: value.to_string(),
                src: self.source.clone(),
                span,
                first: *first,
            });
        }
        seen.insert(value.to_string(), span);
        Ok(())
    }
}

fn value_span(attribute: &Attribute) -> SourceSpan {
    (
        attribute.value_start,
        attribute.value_end.saturating_sub(attribute.value_start),
    )
        .into()
}

fn span_of(entry: &RawEntry, field: &str) -> SourceSpan {
    entry.get(field).map_or_else(
        || (entry.pos_start, entry.pos_end - entry.pos_start).into(),
        value_span,
    )
}

/// Validates a parsed document.
///
/// # Errors
/// See [`Validator::validate`].
pub fn validate_document(
    document: RawDocument,
    mode: ValidationMode,
) -> Result<Vec<LanguageRecord>, RegistryError> {
    Validator::new(mode, document.source).validate(document.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_str;

    fn validate(
        source: &str,
        mode: ValidationMode,
    ) -> Result<Vec<LanguageRecord>, RegistryError> {
        let document = load_str(source, "test.xml").unwrap();
        validate_document(document, mode)
    }

    fn wrap(entries: &str) -> String {
        format!("<iso_639_3_entries>\n{entries}\n</iso_639_3_entries>")
    }

    #[test]
    fn test_valid_entries() {
        let source = wrap(
            r#"<iso_639_3_entry id="aaa" scope="I" type="L" name="Ghotuo"/>
               <iso_639_3_entry id="zho" part1_code="zh" scope="M" type="L" name="Chinese"
                   inverted_name="Chinese"/>"#,
        );
        let records = validate(&source, ValidationMode::Strict).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "aaa");
        assert_eq!(records[0].reference_name, "Ghotuo");
        assert_eq!(records[1].scope, LanguageScope::Macrolanguage);
        assert_eq!(records[1].part1_code.as_deref(), Some("zh"));
        assert_eq!(records[1].inverted_name.as_deref(), Some("Chinese"));
    }

    #[test]
    fn test_reference_name_overrides_name() {
        let source = wrap(
            r#"<iso_639_3_entry id="ell" scope="I" type="L" name="Greek, Modern (1453-)"
                   reference_name="Modern Greek (1453-)"/>"#,
        );
        let records = validate(&source, ValidationMode::Strict).unwrap();
        assert_eq!(records[0].reference_name, "Modern Greek (1453-)");
        assert_eq!(records[0].name, "Greek, Modern (1453-)");
    }

    #[test]
    fn test_invalid_code_format() {
        let source = wrap(r#"<iso_639_3_entry id="EN" scope="I" type="L" name="English"/>"#);
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidCodeFormat { ref code, .. })
                if code == "EN"
        ));
    }

    #[test]
    fn test_invalid_type() {
        let source = wrap(r#"<iso_639_3_entry id="eng" scope="I" type="Z" name="English"/>"#);
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        match err {
            RegistryError::Validation(ValidationError::InvalidFieldValue {
                field, value, code, ..
            }) => {
                assert_eq!(field, "type");
                assert_eq!(value, "Z");
                assert_eq!(code, "eng");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_scope_is_not_coerced() {
        let source = wrap(r#"<iso_639_3_entry id="eng" scope="i" type="L" name="English"/>"#);
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidFieldValue { ref field, .. })
                if field == "scope"
        ));
    }

    #[test]
    fn test_invalid_part1_code() {
        let source = wrap(
            r#"<iso_639_3_entry id="eng" part1_code="eng" scope="I" type="L" name="English"/>"#,
        );
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidFieldValue { ref field, .. })
                if field == "part1_code"
        ));
    }

    #[test]
    fn test_duplicate_code_points_at_both_entries() {
        let source = wrap(
            r#"<iso_639_3_entry id="eng" scope="I" type="L" name="English"/>
               <iso_639_3_entry id="eng" scope="I" type="L" name="English"/>"#,
        );
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        match err {
            RegistryError::Validation(ValidationError::DuplicateCode {
                code, span, first, ..
            }) => {
                assert_eq!(code, "eng");
                assert!(first.offset() < span.offset());
                assert_eq!(&source[span.offset()..span.offset() + span.len()], "eng");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_part1_code() {
        let source = wrap(
            r#"<iso_639_3_entry id="nob" part1_code="nb" scope="I" type="L"
                   name="Norwegian Bokmål"/>
               <iso_639_3_entry id="nno" part1_code="nb" scope="I" type="L"
                   name="Norwegian Nynorsk"/>"#,
        );
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::DuplicateCode { ref field, ref code, .. })
                if field == "part1_code" && code == "nb"
        ));
    }

    #[test]
    fn test_report_mode_collects_everything() {
        let source = wrap(
            r#"<iso_639_3_entry id="eng" scope="I" type="L" name="English"/>
               <iso_639_3_entry id="Fra" scope="I" type="L" name="French"/>
               <iso_639_3_entry id="deu" scope="X" type="L" name="German"/>
               <iso_639_3_entry id="eng" scope="I" type="L" name="English"/>"#,
        );
        let err = validate(&source, ValidationMode::Report).unwrap_err();
        match err {
            RegistryError::ValidationReport { errors } => {
                let codes: Vec<_> = errors.iter().map(ValidationError::entry_code).collect();
                assert_eq!(codes, vec!["Fra", "deu", "eng"]);
                assert!(matches!(errors[2], ValidationError::DuplicateCode { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_stops_at_first() {
        let source = wrap(
            r#"<iso_639_3_entry id="Fra" scope="I" type="L" name="French"/>
               <iso_639_3_entry id="deu" scope="X" type="L" name="German"/>"#,
        );
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidCodeFormat { .. })
        ));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let source = wrap(r#"<iso_639_3_entry id="eng" scope="I" type="L" name=""/>"#);
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        match err {
            RegistryError::Validation(ValidationError::InvalidFieldValue {
                field, code, span, ..
            }) => {
                assert_eq!(field, "name");
                assert_eq!(code, "eng");
                assert_eq!(span.len(), 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_reference_name_is_rejected() {
        let source = wrap(
            r#"<iso_639_3_entry id="eng" scope="I" type="L" name="English" reference_name="  "/>"#,
        );
        let err = validate(&source, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidFieldValue { ref field, .. })
                if field == "reference_name"
        ));
    }

    #[test]
    fn test_entry_with_empty_name_does_not_claim_its_code() {
        let source = wrap(
            r#"<iso_639_3_entry id="eng" scope="I" type="L" name=""/>
               <iso_639_3_entry id="eng" scope="I" type="L" name="English"/>"#,
        );
        let err = validate(&source, ValidationMode::Report).unwrap_err();
        let RegistryError::ValidationReport { errors } = err else {
            panic!("expected a report");
        };
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::InvalidFieldValue { .. }));
    }

    #[test]
    fn test_unknown_attributes_are_ignored() {
        let source = wrap(
            r#"<iso_639_3_entry id="eng" status="Active" scope="I" type="L" name="English"/>"#,
        );
        let records = validate(&source, ValidationMode::Strict).unwrap();
        assert_eq!(records.len(), 1);
    }
}
