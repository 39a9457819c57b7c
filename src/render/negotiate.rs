// src/render/negotiate.rs

//! `Accept` header negotiation.

use super::Format;

/// Media types we can produce, in server preference order.
const OFFERED: &[(&str, Format)] = &[
    ("application/json", Format::Json),
    ("application/xml", Format::Xml),
    ("text/xml", Format::Xml),
    ("application/x-yaml", Format::Yaml),
    ("application/yaml", Format::Yaml),
    ("text/yaml", Format::Yaml),
    ("text/html", Format::Html),
    ("text/csv", Format::Csv),
];

impl Format {
    /// Pick a format for an `Accept` header value.
    ///
    /// - No header (or a blank one) means JSON.
    /// - Entries are tried by descending `q`, ties in header order; `q=0`
    ///   entries are never chosen.
    /// - `*/*` and `type/*` pick the first offered type that fits.
    ///
    /// Returns `None` when nothing acceptable is offered.
    pub fn negotiate(accept: Option<&str>) -> Option<Format> {
        let accept = match accept.map(str::trim) {
            None | Some("") => return Some(OFFERED[0].1),
            Some(a) => a,
        };

        let mut ranges: Vec<(String, f32)> = accept.split(',').filter_map(parse_range).collect();
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranges
            .iter()
            .filter(|(_, q)| *q > 0.0)
            .find_map(|(media, _)| match_offered(media))
    }

    /// Parse a format name as given in a `?format=` query override.
    pub fn from_name(name: &str) -> Option<Format> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            "yaml" | "yml" => Some(Format::Yaml),
            "csv" => Some(Format::Csv),
            "html" => Some(Format::Html),
            _ => None,
        }
    }
}

/// `"text/html;q=0.8"` -> `("text/html", 0.8)`.
fn parse_range(item: &str) -> Option<(String, f32)> {
    let mut parts = item.split(';');
    let media = parts.next()?.trim().to_ascii_lowercase();
    if media.is_empty() {
        return None;
    }

    let mut q = 1.0;
    for param in parts {
        if let Some((name, value)) = param.split_once('=') {
            if name.trim().eq_ignore_ascii_case("q") {
                q = value.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
            }
        }
    }
    Some((media, q))
}

fn match_offered(media: &str) -> Option<Format> {
    if media == "*/*" {
        return Some(OFFERED[0].1);
    }
    if let Some(major) = media.strip_suffix("/*") {
        return OFFERED
            .iter()
            .find(|(offered, _)| offered.split('/').next() == Some(major))
            .map(|(_, f)| *f);
    }
    OFFERED
        .iter()
        .find(|(offered, _)| *offered == media)
        .map(|(_, f)| *f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_header_means_json() {
        assert_eq!(Format::negotiate(None), Some(Format::Json));
        assert_eq!(Format::negotiate(Some("  ")), Some(Format::Json));
    }

    #[test]
    fn exact_matches_ignore_case_and_params() {
        assert_eq!(Format::negotiate(Some("text/CSV; charset=utf-8")), Some(Format::Csv));
        assert_eq!(Format::negotiate(Some("text/xml")), Some(Format::Xml));
        assert_eq!(Format::negotiate(Some("application/x-yaml")), Some(Format::Yaml));
        assert_eq!(Format::negotiate(Some("text/html")), Some(Format::Html));
    }

    #[test]
    fn first_acceptable_entry_wins_by_quality() {
        assert_eq!(
            Format::negotiate(Some("text/csv;q=0.5, application/xml")),
            Some(Format::Xml)
        );
        assert_eq!(
            Format::negotiate(Some("image/png, text/csv")),
            Some(Format::Csv)
        );
    }

    #[test]
    fn wildcards_pick_first_offered() {
        assert_eq!(Format::negotiate(Some("*/*")), Some(Format::Json));
        assert_eq!(Format::negotiate(Some("text/*")), Some(Format::Xml));
        // Typical browser header.
        assert_eq!(
            Format::negotiate(Some("text/html,application/xhtml+xml,*/*;q=0.8")),
            Some(Format::Html)
        );
    }

    #[test]
    fn unsupported_types_are_rejected() {
        assert_eq!(Format::negotiate(Some("image/png")), None);
        assert_eq!(Format::negotiate(Some("text/csv;q=0")), None);
        assert_eq!(Format::negotiate(Some("text/csv;q=abc")), None);
    }

    #[test]
    fn names_parse() {
        assert_eq!(Format::from_name("YML"), Some(Format::Yaml));
        assert_eq!(Format::from_name("pdf"), None);
    }
}
