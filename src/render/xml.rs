// src/render/xml.rs

//! XML rendering.
//!
//! Layout:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <records><record><id>1</id><name>alice</name></record></records>
//! ```
//!
//! Header values become element names, so they go through
//! [`element_name`] first. Field values go through [`text_value`] and are
//! then escaped by `quick-xml`.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::dataset::Dataset;
use crate::errors::Result;
use crate::render::record::records;

pub const ROOT_ELEMENT: &str = "records";
pub const RECORD_ELEMENT: &str = "record";

pub fn to_xml(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    for record in records(dataset) {
        writer.write_event(Event::Start(BytesStart::new(RECORD_ELEMENT)))?;
        for (field, value) in record.fields() {
            let name = element_name(field);
            writer.write_event(Event::Start(BytesStart::new(name.as_ref())))?;
            writer.write_event(Event::Text(BytesText::new(&text_value(value))))?;
            writer.write_event(Event::End(BytesEnd::new(name.as_ref())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(RECORD_ELEMENT)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    Ok(writer.into_inner())
}

/// Turn an arbitrary header value into a valid XML element name.
///
/// - Anything but alphanumerics, `_`, `-` and `.` becomes `_`.
/// - Names that don't start with a letter or `_`, or that start with the
///   reserved `xml` prefix, get a leading `_`.
/// - An empty header becomes `_`.
pub fn element_name(header: &str) -> Cow<'_, str> {
    let is_name_char = |c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.');
    let starts_ok = header
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let reserved = header
        .get(..3)
        .is_some_and(|p| p.eq_ignore_ascii_case("xml"));

    if starts_ok && !reserved && header.chars().all(is_name_char) {
        return Cow::Borrowed(header);
    }

    let mut name = String::with_capacity(header.len() + 1);
    if !starts_ok || reserved {
        name.push('_');
    }
    name.extend(header.chars().map(|c| if is_name_char(c) { c } else { '_' }));
    Cow::Owned(name)
}

/// Replace characters XML 1.0 cannot carry (control characters other than
/// tab, LF and CR, and the `U+FFFE`/`U+FFFF` non-characters) with `U+FFFD`.
pub fn text_value(value: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        !matches!(
            c,
            '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
        )
    };

    if value.chars().all(allowed) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| if allowed(c) { c } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    )
}
