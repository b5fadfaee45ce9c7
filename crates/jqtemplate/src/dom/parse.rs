//! Lenient HTML parser
//!
//! Handles what hand-written templates contain: nested elements, void and
//! self-closing tags, quoted, unquoted and boolean attributes, comments,
//! doctypes, raw-text `script`/`style` and character references. Stray
//! closing tags are ignored and unclosed elements are closed at the end of
//! input. Anything that cannot be recovered from (an unterminated tag,
//! comment or quoted value) is a [`MarkupError`].

use super::{Document, NodeId, MAX_ELEMENT_DEPTH};
use crate::error::MarkupError;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

// Opening one of these while the same tag is still open closes the open one
const SELF_NESTING_CLOSES: &[&str] = &["li", "option", "p", "tr", "td", "th", "dt", "dd"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

impl Document {
    /// Parse markup into a new document.
    ///
    /// If the markup has no `body` element one is synthesized around the
    /// top-level content, so `body` is always a valid render root.
    ///
    /// # Example
    ///
    /// ```
    /// use jqtemplate::Document;
    ///
    /// let doc = Document::parse(r#"<ul id="list"><li>one</li></ul>"#).unwrap();
    /// let list = doc.select_first("#list").unwrap().unwrap();
    /// assert_eq!(doc.describe(list), "body > ul#list");
    /// ```
    pub fn parse(markup: &str) -> Result<Document, MarkupError> {
        let mut doc = Document::new();
        let root = doc.root();
        let mut parser = MarkupParser {
            src: markup,
            pos: 0,
            stack: vec![root],
        };
        parser.run(&mut doc)?;
        doc.ensure_body();
        Ok(doc)
    }

    fn ensure_body(&mut self) {
        let root = self.root();
        if self.find_tag(root, "body").is_some() {
            return;
        }
        let body = self.create_element("body");
        match self.find_tag(root, "html") {
            Some(html) => {
                let content: Vec<NodeId> = self
                    .children(html)
                    .iter()
                    .copied()
                    .filter(|c| self.tag(*c) != Some("head"))
                    .collect();
                for node in content {
                    self.append_child(body, node);
                }
                self.append_child(html, body);
            }
            None => {
                let content = self.children(root).to_vec();
                for node in content {
                    self.append_child(body, node);
                }
                self.append_child(root, body);
            }
        }
    }

    fn find_tag(&self, from: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(from)
            .into_iter()
            .skip(1)
            .find(|node| self.tag(*node) == Some(tag))
    }
}

struct MarkupParser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<NodeId>,
}

impl<'a> MarkupParser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn current(&self) -> NodeId {
        // The root is never popped
        self.stack[self.stack.len() - 1]
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> MarkupError {
        MarkupError {
            message: message.into(),
            offset,
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn run(&mut self, doc: &mut Document) -> Result<(), MarkupError> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                let start = self.pos;
                let end = rest[4..]
                    .find("-->")
                    .ok_or_else(|| self.error("unterminated comment", start))?;
                self.pos += 4 + end + 3;
            } else if rest.starts_with("</") {
                self.closing_tag(doc)?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let start = self.pos;
                let end = rest
                    .find('>')
                    .ok_or_else(|| self.error("unterminated declaration", start))?;
                self.pos += end + 1;
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.opening_tag(doc)?;
            } else {
                self.text(doc);
            }
        }
        Ok(())
    }

    fn text(&mut self, doc: &mut Document) {
        let rest = self.rest();
        // A '<' that doesn't start a tag is literal text
        let skip = rest.chars().next().map_or(0, char::len_utf8);
        let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        let text = decode_entities(&rest[..end]);
        self.pos += end;
        let parent = self.current();
        // Merge with a preceding text node split by a literal '<'
        if let Some(&last) = doc.children(parent).last() {
            if let super::NodeKind::Text(prev) = doc.kind(last) {
                let merged = format!("{}{}", prev, text);
                doc.set_text(last, merged);
                return;
            }
        }
        let node = doc.create_text(text);
        doc.append_child(parent, node);
    }

    fn name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')))
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_ascii_lowercase()
    }

    fn closing_tag(&mut self, doc: &Document) -> Result<(), MarkupError> {
        let start = self.pos;
        self.pos += 2;
        let tag = self.name();
        let end = self
            .rest()
            .find('>')
            .ok_or_else(|| self.error(format!("unterminated closing tag </{}", tag), start))?;
        self.pos += end + 1;
        // Close the nearest open element with this tag; ignore strays
        if let Some(depth) = self
            .stack
            .iter()
            .rposition(|n| doc.tag(*n) == Some(tag.as_str()))
        {
            self.stack.truncate(depth);
        }
        Ok(())
    }

    fn opening_tag(&mut self, doc: &mut Document) -> Result<(), MarkupError> {
        let start = self.pos;
        self.pos += 1;
        let tag = self.name();
        let element = doc.create_element(tag.clone());
        let mut self_closing = false;

        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!("unterminated tag <{}", tag), start));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            self.attribute(doc, element)?;
        }

        if SELF_NESTING_CLOSES.contains(&tag.as_str())
            && self.stack.len() > 1
            && doc.tag(self.current()) == Some(tag.as_str())
        {
            self.stack.pop();
        }
        // The stack holds the root plus every open element
        if self.stack.len() > MAX_ELEMENT_DEPTH {
            return Err(self.error(
                format!("<{}> is nested deeper than {} elements", tag, MAX_ELEMENT_DEPTH),
                start,
            ));
        }
        doc.append_child(self.current(), element);

        if self_closing || is_void(&tag) {
            return Ok(());
        }
        if is_raw_text(&tag) {
            let close = format!("</{}", tag);
            let end = self
                .rest()
                .to_ascii_lowercase()
                .find(&close)
                .unwrap_or(self.rest().len());
            let raw = &self.rest()[..end];
            if !raw.is_empty() {
                let text = doc.create_text(raw);
                doc.append_child(element, text);
            }
            self.pos += end;
            if self.pos < self.src.len() {
                self.stack.push(element);
            }
            return Ok(());
        }
        self.stack.push(element);
        Ok(())
    }

    fn attribute(&mut self, doc: &mut Document, element: NodeId) -> Result<(), MarkupError> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '"' | '\''))
            .unwrap_or(rest.len());
        if end == 0 {
            // Stray character such as a lone '/' or quote
            self.pos += rest.chars().next().map_or(1, char::len_utf8);
            return Ok(());
        }
        let name = rest[..end].to_ascii_lowercase();
        self.pos += end;
        self.skip_ws();

        let mut value = String::new();
        if self.rest().starts_with('=') {
            self.pos += 1;
            self.skip_ws();
            let rest = self.rest();
            match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let start = self.pos;
                    let close = rest[1..]
                        .find(quote)
                        .ok_or_else(|| self.error(format!("unterminated value for attribute `{}`", name), start))?;
                    value = decode_entities(&rest[1..1 + close]);
                    self.pos += close + 2;
                }
                _ => {
                    let end = rest
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(rest.len());
                    value = decode_entities(&rest[..end]);
                    self.pos += end;
                }
            }
        }

        if doc.attr(element, &name).is_none() {
            doc.set_attr(element, name, value);
        }
        Ok(())
    }
}

/// Decode character references; unknown ones are left as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("fish & chips &bogus;"), "fish & chips &bogus;");
    }

    #[test]
    fn test_body_is_synthesized() {
        let doc = Document::parse("<p>hi</p>").unwrap();
        let root = doc.root();
        let body = doc.element_children(root)[0];
        assert_eq!(doc.tag(body), Some("body"));
        assert_eq!(doc.text_content(body), "hi");
    }

    #[test]
    fn test_unterminated_tag_is_an_error() {
        let err = Document::parse("<div><span class=\"x\"").unwrap_err();
        assert_eq!(err.offset, 5);
        let err = Document::parse("<a href='x>").unwrap_err();
        assert_eq!(err.offset, 8);
        assert!(Document::parse("<!-- open").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let within = "<i>".repeat(MAX_ELEMENT_DEPTH);
        assert!(Document::parse(&within).is_ok());

        let err = Document::parse(&"<i>".repeat(100_000)).unwrap_err();
        assert_eq!(err.offset, MAX_ELEMENT_DEPTH * 3);
        assert!(err.message.contains("nested deeper than"));

        // Siblings do not count towards depth
        assert!(Document::parse(&"<i></i>".repeat(10_000)).is_ok());
    }
}
