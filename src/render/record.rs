// src/render/record.rs

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dataset::Dataset;

/// One data row viewed as a `header -> value` mapping.
///
/// Serializes as a map in header column order. If a header name repeats,
/// the later column's value wins but keeps the first column's position.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    header: &'a [String],
    row: &'a [String],
}

impl<'a> Record<'a> {
    pub fn new(header: &'a [String], row: &'a [String]) -> Self {
        Self { header, row }
    }

    /// De-duplicated `(field, value)` pairs in header order.
    pub fn fields(&self) -> Vec<(&'a str, &'a str)> {
        let mut fields: Vec<(&'a str, &'a str)> = Vec::with_capacity(self.header.len());
        for (name, value) in self.header.iter().zip(self.row) {
            match fields.iter_mut().find(|(n, _)| *n == name.as_str()) {
                Some(existing) => existing.1 = value.as_str(),
                None => fields.push((name.as_str(), value.as_str())),
            }
        }
        fields
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, value) in fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Every row of `dataset` as a [`Record`], in row order.
pub fn records(dataset: &Dataset) -> Vec<Record<'_>> {
    dataset
        .rows()
        .iter()
        .map(|row| Record::new(dataset.header(), row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicate_header_keeps_first_position_and_last_value() {
        let header = strings(&["a", "b", "a"]);
        let row = strings(&["1", "2", "3"]);
        let rec = Record::new(&header, &row);
        assert_eq!(rec.fields(), vec![("a", "3"), ("b", "2")]);
        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"a":"3","b":"2"}"#);
    }
}
