use crate::index::{fold_name, Indexes};
use crate::record::LanguageRecord;
use std::fmt;

/// An immutable, validated snapshot of the registry.
///
/// Records are kept in canonical (source file) order. Indexes refer to them
/// by position, so every lookup borrows from the dataset. A new load always
/// produces a new `Dataset`; there is no way to mutate one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    source_name: String,
    records: Vec<LanguageRecord>,
    indexes: Indexes,
}

impl Dataset {
    /// Builds the indexes over records that have already passed validation.
    pub(crate) fn build(source_name: impl Into<String>, records: Vec<LanguageRecord>) -> Self {
        let indexes = Indexes::build(&records);
        log::debug!(
            "indexed {} records ({} distinct names)",
            records.len(),
            indexes.by_name.len()
        );
        Dataset {
            source_name: source_name.into(),
            records,
            indexes,
        }
    }

    /// Name of the file (or label) this dataset was loaded from.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Finds the record with the given ISO 639-3 code. `None` means the code
    /// is not registered, which callers should treat as a normal outcome.
    #[must_use]
    pub fn lookup_by_code(&self, code: &str) -> Option<&LanguageRecord> {
        self.indexes.by_code.get(code).map(|i| &self.records[i])
    }

    /// All records whose reference name is exactly `name`, in canonical order.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Vec<&LanguageRecord> {
        self.resolve(self.indexes.by_name.get(name))
    }

    /// Like [`Dataset::lookup_by_name`], ignoring case and surrounding whitespace.
    #[must_use]
    pub fn lookup_by_name_ignore_case(&self, name: &str) -> Vec<&LanguageRecord> {
        self.resolve(self.indexes.by_folded_name.get(&fold_name(name)))
    }

    /// Finds the record carrying the given two-letter ISO 639-1 code.
    #[must_use]
    pub fn lookup_by_part1(&self, code: &str) -> Option<&LanguageRecord> {
        self.indexes.by_part1.get(code).map(|i| &self.records[i])
    }

    /// Finds the record carrying the given ISO 639-2 code.
    #[must_use]
    pub fn lookup_by_part2(&self, code: &str) -> Option<&LanguageRecord> {
        self.indexes.by_part2.get(code).map(|i| &self.records[i])
    }

    #[must_use]
    pub fn exists(&self, code: &str) -> bool {
        self.indexes.by_code.contains(code)
    }

    /// Reference name for a code.
    #[must_use]
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.lookup_by_code(code).map(|r| r.reference_name.as_str())
    }

    /// Reference names shared by more than one record, with the codes that share them.
    #[must_use]
    pub fn shared_names(&self) -> Vec<(&str, Vec<&str>)> {
        let mut shared: Vec<(&str, Vec<&str>)> = self
            .indexes
            .by_name
            .collisions()
            .map(|(name, positions)| {
                let codes = positions
                    .iter()
                    .map(|&i| self.records[i].code.as_str())
                    .collect();
                (name, codes)
            })
            .collect();
        shared.sort_unstable_by(|a, b| a.0.cmp(b.0));
        shared
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, LanguageRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[LanguageRecord] {
        &self.records
    }

    pub(crate) fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&LanguageRecord> {
        positions.iter().map(|&i| &self.records[i]).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LanguageRecord;
    type IntoIter = std::slice::Iter<'a, LanguageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ISO 639-3 dataset from {}: {} records",
            self.source_name,
            self.records.len()
        )
    }
}
