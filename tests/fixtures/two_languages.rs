// Automatically generated by iso639-core v0.1.0 from two_languages.xml.
// 2 language records. Do not edit by hand.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub reference_name: &'static str,
    pub language_type: &'static str,
    pub scope: &'static str,
    pub name: &'static str,
    pub inverted_name: Option<&'static str>,
    pub common_name: Option<&'static str>,
    pub part1_code: Option<&'static str>,
    pub part2_code: Option<&'static str>,
}

/// Records in registry order.
pub static LANGUAGES: [LanguageEntry; 2] = [
    LanguageEntry {
        code: "eng",
        reference_name: "English",
        language_type: "L",
        scope: "I",
        name: "English",
        inverted_name: None,
        common_name: None,
        part1_code: Some("en"),
        part2_code: Some("eng"),
    },
    LanguageEntry {
        code: "fra",
        reference_name: "French",
        language_type: "L",
        scope: "I",
        name: "French",
        inverted_name: None,
        common_name: None,
        part1_code: Some("fr"),
        part2_code: Some("fra"),
    },
];

/// Code to position in `LANGUAGES`, sorted by code.
pub static BY_CODE: [(&str, usize); 2] = [
    ("eng", 0),
    ("fra", 1),
];

/// Reference name to positions in `LANGUAGES`, sorted by name.
pub static BY_NAME: [(&str, &[usize]); 2] = [
    ("English", &[0]),
    ("French", &[1]),
];
