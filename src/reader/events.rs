//! Markup Event Types
//!
//! Event types for pull-parser style markup processing.

use std::borrow::Cow;

/// Markup parsing event
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement),
    /// Empty element: <name attrs.../> or an HTML void element
    EmptyElement(StartElement<'a>),
    /// Raw text content between tags (references not decoded)
    Text(&'a [u8]),
    /// CDATA section content
    CData(&'a [u8]),
    /// Comment content
    Comment(&'a [u8]),
    /// Processing instruction: <?target data?>
    ProcessingInstruction { target: &'a [u8] },
    /// DOCTYPE or other <! declaration
    DocType(&'a [u8]),
}

/// Start element event data
#[derive(Debug, Clone, PartialEq)]
pub struct StartElement<'a> {
    /// ASCII-lowercased element name
    pub name: String,
    /// Element attributes in source order
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    /// Get attribute value by (lowercased) name
    pub fn get_attribute_value(&self, name: &str) -> Option<Cow<'a, str>> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| String::from_utf8_lossy(a.value))
    }
}

/// End element event data
#[derive(Debug, Clone, PartialEq)]
pub struct EndElement {
    /// ASCII-lowercased element name
    pub name: String,
}

/// A single attribute, value kept raw
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    pub name: String,
    pub value: &'a [u8],
}

/// Lowercase a raw markup name into an owned string
#[inline]
pub fn lower_name(raw: &[u8]) -> String {
    let mut name = String::from_utf8_lossy(raw).into_owned();
    name.make_ascii_lowercase();
    name
}

/// Parse the attribute section of a start tag (between name and '>')
///
/// Accepts double-quoted, single-quoted, unquoted and bare attributes.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    let mut attrs = Vec::new();
    let mut pos = 0;
    let len = input.len();

    while pos < len {
        while pos < len && (input[pos].is_ascii_whitespace() || input[pos] == b'/') {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        let name_start = pos;
        while pos < len && !input[pos].is_ascii_whitespace() && !matches!(input[pos], b'=' | b'/') {
            pos += 1;
        }
        let name = lower_name(&input[name_start..pos]);

        while pos < len && input[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len || input[pos] != b'=' {
            attrs.push(Attribute { name, value: b"" });
            continue;
        }
        pos += 1;
        while pos < len && input[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let value = match input.get(pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = pos + 1;
                let value_end = memchr::memchr(quote, &input[value_start..])
                    .map_or(len, |i| value_start + i);
                pos = (value_end + 1).min(len);
                &input[value_start..value_end]
            }
            _ => {
                let value_start = pos;
                while pos < len && !input[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                &input[value_start..pos]
            }
        };
        attrs.push(Attribute { name, value });
    }

    attrs
}
