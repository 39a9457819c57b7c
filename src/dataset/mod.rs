// src/dataset/mod.rs

//! In-memory tables parsed from CSV files.
//!
//! A [`Dataset`] is immutable once built: the registry replaces whole
//! datasets on reload and never edits one in place.

pub mod loader;

pub use loader::{load, read_source, records};

/// One parsed CSV file: the first record is the header, the rest are rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Split materialized records into header + rows.
    ///
    /// Returns `None` when there are no records (or the header has no
    /// fields), so an empty file never becomes a dataset.
    pub fn from_records(records: Vec<Vec<String>>) -> Option<Self> {
        let mut iter = records.into_iter();
        let header = iter.next()?;
        if header.is_empty() {
            return None;
        }
        Some(Self {
            header,
            rows: iter.collect(),
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_record_becomes_header() {
        let ds = Dataset::from_records(vec![rec(&["id", "name"]), rec(&["1", "alice"])]).unwrap();
        assert_eq!(ds.header(), &["id", "name"]);
        assert_eq!(ds.rows(), &[rec(&["1", "alice"])]);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn header_only_yields_dataset_without_rows() {
        let ds = Dataset::from_records(vec![rec(&["id"])]).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn no_records_yields_none() {
        assert!(Dataset::from_records(Vec::new()).is_none());
        assert!(Dataset::from_records(vec![Vec::new()]).is_none());
    }
}
