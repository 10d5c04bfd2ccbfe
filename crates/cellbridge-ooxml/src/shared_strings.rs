//! Shared string table (xl/sharedStrings.xml)
//!
//! Strings are interned in first-occurrence order. Indices never change once
//! assigned, so a cell that stores an index stays valid while the table grows.

use std::collections::HashMap;

use crate::error::{CellbridgeError, Result};

/// Deduplicated, insertion-ordered string table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedStringTable {
    /// Strings in index order
    strings: Vec<String>,
    /// String to first index holding it
    lookup: HashMap<String, usize>,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an ordered list read out of a package.
    ///
    /// Packages may legally repeat a string; every entry keeps its position
    /// and lookups resolve to the first one.
    pub fn from_strings(strings: Vec<String>) -> Self {
        let mut lookup = HashMap::with_capacity(strings.len());
        for (index, s) in strings.iter().enumerate() {
            lookup.entry(s.clone()).or_insert(index);
        }
        Self { strings, lookup }
    }

    /// Intern a string, returning its index.
    ///
    /// An exact (case-sensitive) match returns the existing index.
    pub fn add_string(&mut self, s: &str) -> usize {
        if let Some(&index) = self.lookup.get(s) {
            return index;
        }
        let index = self.strings.len();
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), index);
        index
    }

    pub fn index_of(&self, s: &str) -> Option<usize> {
        self.lookup.get(s).copied()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Resolve a cell's shared-string index.
    pub fn resolve(&self, index: usize) -> Result<&str> {
        self.get(index).ok_or_else(|| {
            CellbridgeError::Resolution(format!(
                "index {index} out of range (table has {} entries)",
                self.strings.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}
