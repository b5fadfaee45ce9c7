//! Markup serialization

use super::parse::{is_raw_text, is_void};
use super::{Document, NodeId, NodeKind};

impl Document {
    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    /// Serialize a node including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write(vec![Step::Node(id, false)], &mut out);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write(self.child_steps(id), &mut out);
        out
    }

    /// Children of `id` as pending steps, first child on top.
    fn child_steps(&self, id: NodeId) -> Vec<Step<'_>> {
        let raw = self.tag(id).is_some_and(is_raw_text);
        self.children(id)
            .iter()
            .rev()
            .map(|child| Step::Node(*child, raw))
            .collect()
    }

    fn write<'a>(&'a self, mut pending: Vec<Step<'a>>, out: &mut String) {
        while let Some(step) = pending.pop() {
            let (id, raw) = match step {
                Step::Close(tag) => {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                    continue;
                }
                Step::Node(id, raw) => (id, raw),
            };
            match self.kind(id) {
                NodeKind::Document => pending.extend(self.child_steps(id)),
                NodeKind::Text(text) if raw => out.push_str(text),
                NodeKind::Text(text) => escape_into(text, false, out),
                NodeKind::Element { tag, attrs } => {
                    out.push('<');
                    out.push_str(tag);
                    for (name, value) in attrs {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        escape_into(value, true, out);
                        out.push('"');
                    }
                    out.push('>');
                    if !is_void(tag) {
                        pending.push(Step::Close(tag));
                        pending.extend(self.child_steps(id));
                    }
                }
            }
        }
    }
}

/// Pending serializer work: a node to open, or a tag to close.
enum Step<'a> {
    Node(NodeId, bool),
    Close(&'a str),
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
