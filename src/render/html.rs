// src/render/html.rs

//! Minimal built-in HTML views: an index of keys and a dataset detail page.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::dataset::Dataset;

/// Page listing every registered dataset key.
pub fn index_page(keys: &[String]) -> String {
    let mut out = page_start("csvwatch");
    push_index(&mut out, keys);
    out.push_str("</body>\n</html>\n");
    out
}

/// Key listing plus `dataset` as a table.
pub fn detail_page(keys: &[String], key: &str, dataset: &Dataset) -> String {
    let mut out = page_start(key);
    push_index(&mut out, keys);

    let _ = writeln!(out, "<h2>{}</h2>", escape(key));
    out.push_str("<table>\n<thead><tr>");
    for field in dataset.header() {
        let _ = write!(out, "<th>{}</th>", escape(field.as_str()));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in dataset.rows() {
        out.push_str("<tr>");
        for value in row {
            let _ = write!(out, "<td>{}</td>", escape(value.as_str()));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}

fn page_start(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape(title)
    )
}

fn push_index(out: &mut String, keys: &[String]) {
    let _ = writeln!(out, "<h1>Datasets ({})</h1>", keys.len());
    out.push_str("<ul>\n");
    for key in keys {
        let key = escape(key.as_str());
        let _ = writeln!(out, "<li><a href=\"/api/{key}\">{key}</a></li>");
    }
    out.push_str("</ul>\n");
}
