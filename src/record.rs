use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Raw entries produced by the loader ---

/// One attribute of an entry element, with byte offsets into the source.
#[derive(Debug, PartialEq, Clone)]
pub struct Attribute {
    pub name: String,
    /// The value with entity references already decoded.
    pub value: String,
    pub pos_start: usize,
    pub pos_end: usize,
    /// Byte range of the value between its quotes.
    pub value_start: usize,
    pub value_end: usize,
}

/// The attribute set of one `<iso_639_3_entry>`, as the loader hands it to
/// the validator. Nothing here has been checked beyond required presence.
#[derive(Debug, PartialEq, Clone)]
pub struct RawEntry {
    pub attributes: Vec<Attribute>,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl RawEntry {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|a| a.value.as_str())
    }
}

// --- Validated record model ---

/// One registered language.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct LanguageRecord {
    pub code: String,
    pub reference_name: String,
    #[serde(rename = "type")]
    pub language_type: LanguageType,
    pub scope: LanguageScope,
    pub name: String,
    pub inverted_name: Option<String>,
    pub common_name: Option<String>,
    pub part1_code: Option<String>,
    pub part2_code: Option<String>,
}

/// ISO 639-3 language type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum LanguageType {
    #[serde(rename = "A")]
    Ancient,
    #[serde(rename = "C")]
    Constructed,
    #[serde(rename = "E")]
    Extinct,
    #[serde(rename = "H")]
    Historical,
    #[serde(rename = "L")]
    Living,
    #[serde(rename = "S")]
    Special,
}

/// ISO 639-3 scope: whether an identifier denotes one language, a
/// macrolanguage grouping, or a special-purpose code.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum LanguageScope {
    #[serde(rename = "I")]
    Individual,
    #[serde(rename = "M")]
    Macrolanguage,
    #[serde(rename = "S")]
    Special,
}

/// A registry enumeration written as a single letter in the source file.
pub trait RegistryEnum: Sized + Copy + 'static {
    /// The attribute holding this value.
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn letter(self) -> &'static str;
    fn label(self) -> &'static str;

    fn from_letter(letter: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.letter() == letter)
    }

    /// Accepted letters, for diagnostics.
    fn allowed() -> String {
        let letters = Self::ALL
            .iter()
            .map(|v| format!("{} ({})", v.letter(), v.label()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("one of {letters}")
    }
}

impl RegistryEnum for LanguageType {
    const FIELD: &'static str = "type";
    const ALL: &'static [Self] = &[
        LanguageType::Ancient,
        LanguageType::Constructed,
        LanguageType::Extinct,
        LanguageType::Historical,
        LanguageType::Living,
        LanguageType::Special,
    ];

    fn letter(self) -> &'static str {
        match self {
            LanguageType::Ancient => "A",
            LanguageType::Constructed => "C",
            LanguageType::Extinct => "E",
            LanguageType::Historical => "H",
            LanguageType::Living => "L",
            LanguageType::Special => "S",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LanguageType::Ancient => "Ancient",
            LanguageType::Constructed => "Constructed",
            LanguageType::Extinct => "Extinct",
            LanguageType::Historical => "Historical",
            LanguageType::Living => "Living",
            LanguageType::Special => "Special",
        }
    }
}

impl RegistryEnum for LanguageScope {
    const FIELD: &'static str = "scope";
    const ALL: &'static [Self] = &[
        LanguageScope::Individual,
        LanguageScope::Macrolanguage,
        LanguageScope::Special,
    ];

    fn letter(self) -> &'static str {
        match self {
            LanguageScope::Individual => "I",
            LanguageScope::Macrolanguage => "M",
            LanguageScope::Special => "S",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LanguageScope::Individual => "Individual",
            LanguageScope::Macrolanguage => "Macrolanguage",
            LanguageScope::Special => "Special",
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for LanguageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LanguageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letter(s).ok_or_else(|| s.to_string())
    }
}

impl FromStr for LanguageScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letter(s).ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for LanguageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            self.code, self.reference_name, self.language_type, self.scope
        )?;
        if let Some(part1) = &self.part1_code {
            write!(f, " [639-1: {part1}]")?;
        }
        if let Some(part2) = &self.part2_code {
            write!(f, " [639-2: {part2}]")?;
        }
        Ok(())
    }
}
