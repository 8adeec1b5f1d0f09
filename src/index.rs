//! Keyed views over a record slice. Indexes store positions into the
//! owning vector, never records.

use crate::record::LanguageRecord;
use std::collections::HashMap;

/// One-to-one index: each key maps to exactly one position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UniqueIndex {
    positions: HashMap<String, usize>,
}

impl UniqueIndex {
    /// Builds the index from `key`, skipping records for which it returns `None`.
    ///
    /// Callers must pass keys that the validator has already proven unique;
    /// a repeated key is a logic error.
    pub fn build<'a, F>(records: &'a [LanguageRecord], key: F) -> Self
    where
        F: Fn(&'a LanguageRecord) -> Option<&'a str>,
    {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if let Some(k) = key(record) {
                let previous = positions.insert(k.to_string(), position);
                debug_assert!(previous.is_none(), "duplicate key `{k}` in unique index");
            }
        }
        UniqueIndex { positions }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Key/position pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.positions.iter().map(|(k, &p)| (k.as_str(), p))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// One-to-many index. Positions under each key stay in canonical order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MultiIndex {
    positions: HashMap<String, Vec<usize>>,
}

impl MultiIndex {
    pub fn build<F>(records: &[LanguageRecord], key: F) -> Self
    where
        F: Fn(&LanguageRecord) -> String,
    {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            positions.entry(key(record)).or_default().push(position);
        }
        MultiIndex { positions }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> &[usize] {
        match self.positions.get(key) {
            Some(positions) => positions,
            None => &[],
        }
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total number of positions across all keys.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }

    /// Key/positions pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.positions
            .iter()
            .map(|(k, p)| (k.as_str(), p.as_slice()))
    }

    /// Keys shared by more than one record.
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.iter().filter(|(_, p)| p.len() > 1)
    }
}

/// Every index built over one record set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Indexes {
    pub by_code: UniqueIndex,
    pub by_name: MultiIndex,
    pub by_folded_name: MultiIndex,
    pub by_part1: UniqueIndex,
    pub by_part2: UniqueIndex,
}

impl Indexes {
    #[must_use]
    pub fn build(records: &[LanguageRecord]) -> Self {
        let indexes = Indexes {
            by_code: UniqueIndex::build(records, |r| Some(r.code.as_str())),
            by_name: MultiIndex::build(records, |r| r.reference_name.clone()),
            by_folded_name: MultiIndex::build(records, |r| fold_name(&r.reference_name)),
            by_part1: UniqueIndex::build(records, |r| r.part1_code.as_deref()),
            by_part2: UniqueIndex::build(records, |r| r.part2_code.as_deref()),
        };
        debug_assert_eq!(indexes.by_code.len(), records.len());
        debug_assert_eq!(indexes.by_name.entry_count(), records.len());
        debug_assert_eq!(indexes.by_folded_name.entry_count(), records.len());
        indexes
    }
}

/// Key used by case-insensitive name lookups.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}
