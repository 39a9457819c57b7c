// src/render/mod.rs

//! Content negotiation and serialization of datasets.
//!
//! [`Format`] is the closed set of response formats. Anything a client asks
//! for outside that set is rejected by [`Format::negotiate`] before any
//! rendering happens; [`render`] then maps every variant to exactly one
//! renderer.

pub mod html;
pub mod negotiate;
pub mod record;
pub mod xml;

use crate::dataset::Dataset;
use crate::errors::Result;
use crate::registry::Registry;

pub use record::{records, Record};

pub const MIME_JSON: &str = "application/json; charset=utf-8";
pub const MIME_XML: &str = "application/xml; charset=utf-8";
pub const MIME_YAML: &str = "application/x-yaml; charset=utf-8";
pub const MIME_CSV: &str = "text/csv; charset=utf-8";
pub const MIME_HTML: &str = "text/html; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
    Yaml,
    Csv,
    Html,
}

impl Format {
    /// `Content-Type` header value for responses in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => MIME_JSON,
            Format::Xml => MIME_XML,
            Format::Yaml => MIME_YAML,
            Format::Csv => MIME_CSV,
            Format::Html => MIME_HTML,
        }
    }
}

/// A rendered response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Render `dataset` (registered under `key`) as `format`.
///
/// `registry` is only consulted for the HTML view, which lists every key.
pub fn render(format: Format, key: &str, dataset: &Dataset, registry: &Registry) -> Result<Rendered> {
    let body = match format {
        Format::Json => serde_json::to_vec(&records(dataset))?,
        Format::Yaml => serde_yaml::to_string(&records(dataset))?.into_bytes(),
        Format::Xml => xml::to_xml(dataset)?,
        Format::Csv => to_csv(dataset)?,
        Format::Html => html::detail_page(&registry.keys(), key, dataset).into_bytes(),
    };

    Ok(Rendered {
        content_type: format.content_type(),
        body,
    })
}

/// Header row followed by every data row.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.header())?;
    for row in dataset.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn loaded(content: &str) -> (Registry, Arc<Dataset>) {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", content);
        let reg = Registry::new("data", Arc::new(fs));
        reg.reload(Path::new("data/a.csv")).unwrap();
        let ds = reg.get("a.csv").unwrap();
        (reg, ds)
    }

    #[test]
    fn json_preserves_header_order_and_rows() {
        let (reg, ds) = loaded("id,name\n1,alice\n2,bob\n");
        let out = render(Format::Json, "a.csv", &ds, &reg).unwrap();
        assert_eq!(out.content_type, MIME_JSON);
        assert_eq!(
            String::from_utf8(out.body).unwrap(),
            r#"[{"id":"1","name":"alice"},{"id":"2","name":"bob"}]"#
        );
    }

    #[test]
    fn json_keeps_column_order_not_alphabetical() {
        let (reg, ds) = loaded("zeta,alpha\n1,2\n");
        let out = render(Format::Json, "a.csv", &ds, &reg).unwrap();
        assert_eq!(String::from_utf8(out.body).unwrap(), r#"[{"zeta":"1","alpha":"2"}]"#);
    }

    #[test]
    fn header_only_renders_empty_sequences() {
        let (reg, ds) = loaded("id,name\n");
        let json = render(Format::Json, "a.csv", &ds, &reg).unwrap();
        assert_eq!(json.body, b"[]");
        let csv = render(Format::Csv, "a.csv", &ds, &reg).unwrap();
        assert_eq!(csv.body, b"id,name\n");
    }

    #[test]
    fn csv_round_trips_verbatim() {
        let (reg, ds) = loaded("id,name\n1,alice\n2,bob\n");
        let out = render(Format::Csv, "a.csv", &ds, &reg).unwrap();
        assert_eq!(out.content_type, "text/csv; charset=utf-8");
        assert_eq!(out.body, b"id,name\n1,alice\n2,bob\n");
    }

    #[test]
    fn csv_requotes_fields_that_need_it() {
        let (reg, ds) = loaded("a,b\n\"x, y\",\"say \"\"hi\"\"\"\n");
        let out = render(Format::Csv, "a.csv", &ds, &reg).unwrap();
        assert_eq!(out.body, b"a,b\n\"x, y\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn yaml_is_a_sequence_of_mappings() {
        let (reg, ds) = loaded("id,name\n1,alice\n");
        let out = render(Format::Yaml, "a.csv", &ds, &reg).unwrap();
        assert_eq!(out.content_type, MIME_YAML);

        let parsed: Vec<std::collections::BTreeMap<String, String>> =
            serde_yaml::from_slice(&out.body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["id"], "1");
        assert_eq!(parsed[0]["name"], "alice");
    }

    #[test]
    fn html_lists_keys_and_table() {
        let (reg, ds) = loaded("id,name\n1,<b>alice</b>\n");
        let out = render(Format::Html, "a.csv", &ds, &reg).unwrap();
        let body = String::from_utf8(out.body).unwrap();
        assert_eq!(out.content_type, MIME_HTML);
        assert!(body.contains("href=\"/api/a.csv\""));
        assert!(body.contains("<th>name</th>"));
        assert!(body.contains("&lt;b&gt;alice&lt;/b&gt;"));
    }
}
