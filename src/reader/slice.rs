//! Lenient Slice Reader
//!
//! Pulls markup events from a byte slice. Never fails: anything that does
//! not look like markup is reported as text, unterminated constructs run to
//! the end of input.

use super::events::{lower_name, parse_attributes, EndElement, MarkupEvent, StartElement};
use crate::core::scanner::{is_name_start_char, Scanner};

/// HTML elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Check whether a (lowercased) element name is an HTML void element
#[inline]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Zero-copy markup reader from a byte slice
pub struct SliceReader<'a> {
    scanner: Scanner<'a>,
    /// Set after a raw text start tag: (name, text pending?)
    raw_text: Option<(String, bool)>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            scanner: Scanner::new(input),
            raw_text: None,
        }
    }

    /// Get the next markup event
    pub fn next_event(&mut self) -> Option<MarkupEvent<'a>> {
        if let Some(event) = self.next_raw_text() {
            return Some(event);
        }

        loop {
            if self.scanner.is_eof() {
                return None;
            }

            let start = self.scanner.position();
            if self.scanner.peek_at(0) != Some(b'<') {
                return Some(self.read_text(start));
            }

            if self.scanner.starts_with(b"<!--") {
                let body = start + 4;
                return Some(MarkupEvent::Comment(self.read_until(body, b"-->")));
            }
            if self.scanner.starts_with(b"<![CDATA[") {
                let body = start + 9;
                return Some(MarkupEvent::CData(self.read_until(body, b"]]>")));
            }
            if self.scanner.starts_with(b"<!") {
                let body = start + 2;
                return Some(MarkupEvent::DocType(self.read_until(body, b">")));
            }
            if self.scanner.starts_with(b"<?") {
                let body = start + 2;
                return Some(MarkupEvent::ProcessingInstruction {
                    target: self.read_until(body, b">"),
                });
            }
            if self.scanner.starts_with(b"</") {
                self.scanner.set_position(start + 2);
                match self.scanner.read_name() {
                    Some(name) => {
                        let name = lower_name(name);
                        self.skip_past_tag_end();
                        return Some(MarkupEvent::EndElement(EndElement { name }));
                    }
                    None => {
                        // "</>" or "</ 3": swallow as a bogus comment
                        self.skip_past_tag_end();
                        continue;
                    }
                }
            }

            if self.scanner.peek_at(1).is_some_and(is_name_start_char) {
                return Some(self.read_start_tag(start));
            }

            // Stray '<': treat as text
            return Some(self.read_text(start));
        }
    }

    /// Emit pending raw text content and the synthesized end tag
    fn next_raw_text(&mut self) -> Option<MarkupEvent<'a>> {
        let (name, text_pending) = self.raw_text.take()?;
        let start = self.scanner.position();
        let close = self.scanner.find_close_tag(name.as_bytes());
        let end = close.unwrap_or_else(|| self.scanner.len());

        if text_pending && end > start {
            self.raw_text = Some((name, false));
            self.scanner.set_position(end);
            return Some(MarkupEvent::Text(self.scanner.slice(start, end)));
        }

        if let Some(close) = close {
            self.scanner.set_position(close + 2);
            let _ = self.scanner.read_name();
            self.skip_past_tag_end();
        }
        Some(MarkupEvent::EndElement(EndElement { name }))
    }

    /// Text up to the next '<' that opens markup; stray '<' stay in the run
    fn read_text(&mut self, start: usize) -> MarkupEvent<'a> {
        let mut from = start + 1;
        let end = loop {
            self.scanner.set_position(from);
            match self.scanner.find_tag_start() {
                Some(lt) => {
                    self.scanner.set_position(lt);
                    if self.at_markup() {
                        break lt;
                    }
                    from = lt + 1;
                }
                None => break self.scanner.len(),
            }
        };
        self.scanner.set_position(end);
        MarkupEvent::Text(self.scanner.slice(start, end))
    }

    /// Whether the '<' under the cursor starts a tag, comment, or declaration
    fn at_markup(&self) -> bool {
        match self.scanner.peek_at(1) {
            Some(b'!') | Some(b'?') | Some(b'/') => true,
            Some(b) => is_name_start_char(b),
            None => false,
        }
    }

    /// Read from `body` to `terminator`, leaving the scanner after it
    fn read_until(&mut self, body: usize, terminator: &[u8]) -> &'a [u8] {
        self.scanner.set_position(body);
        match self.scanner.find_seq(terminator) {
            Some(end) => {
                self.scanner.set_position(end + terminator.len());
                self.scanner.slice(body, end)
            }
            None => {
                let end = self.scanner.len();
                self.scanner.set_position(end);
                self.scanner.slice(body.min(end), end)
            }
        }
    }

    fn skip_past_tag_end(&mut self) {
        match self.scanner.find_tag_end_quoted() {
            Some(end) => self.scanner.set_position(end + 1),
            None => {
                let end = self.scanner.len();
                self.scanner.set_position(end);
            }
        }
    }

    fn read_start_tag(&mut self, start: usize) -> MarkupEvent<'a> {
        self.scanner.set_position(start + 1);
        let raw_name = self.scanner.read_name().unwrap_or_default();
        let name = lower_name(raw_name);
        let attrs_start = self.scanner.position();

        let (attrs_end, self_closing) = match self.scanner.find_tag_end_quoted() {
            Some(end) => {
                self.scanner.set_position(end + 1);
                let closing = end > attrs_start && self.scanner.slice(end - 1, end) == b"/";
                (if closing { end - 1 } else { end }, closing)
            }
            None => {
                let end = self.scanner.len();
                self.scanner.set_position(end);
                (end, false)
            }
        };

        let element = StartElement {
            attributes: parse_attributes(self.scanner.slice(attrs_start, attrs_end)),
            name,
        };

        if self_closing || is_void_element(&element.name) {
            return MarkupEvent::EmptyElement(element);
        }
        if RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            self.raw_text = Some((element.name.clone(), true));
        }
        MarkupEvent::StartElement(element)
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events: Vec<_> = SliceReader::new(b"<root>hello</root>").collect();
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], MarkupEvent::StartElement(e) if e.name == "root"));
        assert!(matches!(&events[1], MarkupEvent::Text(t) if *t == b"hello"));
        assert!(matches!(&events[2], MarkupEvent::EndElement(e) if e.name == "root"));
    }

    #[test]
    fn test_empty_and_void_elements() {
        let events: Vec<_> = SliceReader::new(b"<br><img src='a.png'/><x/>").collect();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| matches!(e, MarkupEvent::EmptyElement(_))));
    }

    #[test]
    fn test_names_are_lowercased() {
        let events: Vec<_> = SliceReader::new(b"<DIV Class=\"c\"></Div>").collect();
        match &events[0] {
            MarkupEvent::StartElement(e) => {
                assert_eq!(e.name, "div");
                assert_eq!(e.get_attribute_value("class").as_deref(), Some("c"));
            }
            other => panic!("Expected StartElement, got {:?}", other),
        }
        assert!(matches!(&events[1], MarkupEvent::EndElement(e) if e.name == "div"));
    }

    #[test]
    fn test_raw_text_element() {
        let events: Vec<_> =
            SliceReader::new(b"<script>if (a<b) { x = '</p>'; }</script><p>t</p>").collect();
        assert!(matches!(&events[0], MarkupEvent::StartElement(e) if e.name == "script"));
        assert!(matches!(&events[1], MarkupEvent::Text(t) if *t == b"if (a<b) { x = '</p>'; }"));
        assert!(matches!(&events[2], MarkupEvent::EndElement(e) if e.name == "script"));
        assert!(matches!(&events[3], MarkupEvent::StartElement(e) if e.name == "p"));
    }

    #[test]
    fn test_empty_raw_text_element() {
        let events: Vec<_> = SliceReader::new(b"<style></style>").collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], MarkupEvent::EndElement(e) if e.name == "style"));
    }

    #[test]
    fn test_comment_doctype_cdata() {
        let events: Vec<_> =
            SliceReader::new(b"<!DOCTYPE html><!-- c --><r><![CDATA[x<y]]></r>").collect();
        assert!(matches!(&events[0], MarkupEvent::DocType(_)));
        assert!(matches!(&events[1], MarkupEvent::Comment(c) if *c == b" c "));
        assert!(matches!(&events[3], MarkupEvent::CData(c) if *c == b"x<y"));
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let events: Vec<_> = SliceReader::new(b"<p>1 < 2</p>").collect();
        let text: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                MarkupEvent::Text(t) => Some(t.to_vec()),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(text, b"1 < 2");
        let texts = events.iter().filter(|e| matches!(e, MarkupEvent::Text(_))).count();
        assert_eq!(texts, 1);
    }

    #[test]
    fn test_stray_brackets_join_one_text_run() {
        let events: Vec<_> = SliceReader::new(b"a < b <3 <b>x</b> < end").collect();
        assert_eq!(events[0], MarkupEvent::Text(b"a < b <3 "));
        assert!(matches!(&events[1], MarkupEvent::StartElement(e) if e.name == "b"));
        assert_eq!(events[4], MarkupEvent::Text(b" < end"));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_unterminated_input() {
        let events: Vec<_> = SliceReader::new(b"<a><!-- never closed").collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], MarkupEvent::Comment(c) if *c == b" never closed"));
    }
}
