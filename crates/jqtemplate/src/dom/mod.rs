//! Arena-backed document tree
//!
//! Nodes live in one `Vec` and are addressed by [`NodeId`]. Detaching a node
//! only unlinks it from its parent; its id stays valid, so a caller holding
//! an id to a removed loop placeholder can still inspect it.

pub mod events;
pub mod parse;
pub mod select;
pub mod serialize;

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use events::Handler;

/// Stable handle to a node within one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Deepest element nesting accepted by the markup parser, the compiler and
/// the evaluator. All three walk the tree recursively or keep a stack per
/// level.
pub const MAX_ELEMENT_DEPTH: usize = 256;

/// Ordered attribute map of an element.
pub type Attributes = IndexMap<String, String>;

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The synthetic document root
    Document,

    /// An element with its attributes
    Element {
        /// Lower-case tag name
        tag: String,
        /// Attributes in source order
        attrs: Attributes,
    },

    /// Character data
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of elements and text nodes under a synthetic root.
///
/// The arena only grows. Every render that clones a fragment, and every
/// loop that replaces a placeholder, leaves nodes behind that no longer
/// hang off the root. [`Document::remove`] drops the event handlers of such
/// a subtree; the node slots themselves live as long as the document, so a
/// host that re-renders indefinitely should start from a fresh document
/// now and then.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    handlers: HashMap<NodeId, Vec<Handler>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            handlers: HashMap::new(),
        }
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Check if `id` was issued by this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ═══════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Attributes::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Copy `id` and its whole subtree into new detached nodes.
    ///
    /// Event handlers are not copied.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.push(self.nodes[id.0].kind.clone());
        let mut pending = vec![(id, copy)];
        while let Some((source, target)) = pending.pop() {
            let children = self.nodes[source.0].children.clone();
            for child in children {
                let child_copy = self.push(self.nodes[child.0].kind.clone());
                self.nodes[child_copy.0].parent = Some(target);
                self.nodes[target.0].children.push(child_copy);
                pending.push((child, child_copy));
            }
        }
        copy
    }

    // ═══════════════════════════════════════════════════════════════════
    // Tree Structure
    // ═══════════════════════════════════════════════════════════════════

    /// The node's kind.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Parent of the node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// All child nodes, text included.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element children only, as a snapshot.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// The node and every node below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    /// Check if the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    /// Check if the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current == self.root()
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `node` as the next sibling of `reference`.
    ///
    /// Returns `false` (and leaves `node` where it was) when `reference`
    /// has no parent.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> bool {
        if self.nodes[reference.0].parent.is_none() {
            return false;
        }
        self.detach(node);
        // Re-read: detaching `node` may have shifted `reference`'s position
        let Some(parent) = self.nodes[reference.0].parent else {
            return false;
        };
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|c| *c == reference)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(pos, node);
        self.nodes[node.0].parent = Some(parent);
        true
    }

    /// Unlink the node from its parent. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Detach the node and drop every event handler bound in its subtree.
    ///
    /// Ids stay valid; only the handlers are released.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
        if self.handlers.is_empty() {
            return;
        }
        for node in self.descendants(id) {
            self.handlers.remove(&node);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Elements and Attributes
    // ═══════════════════════════════════════════════════════════════════

    /// Tag name, for elements.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Attributes of an element.
    pub fn attrs(&self, id: NodeId) -> Option<&Attributes> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Value of one attribute.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)?.get(name).map(String::as_str)
    }

    /// Check if an element carries an attribute.
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attrs(id).is_some_and(|a| a.contains_key(name))
    }

    /// Set an attribute, overwriting any existing value. No-op on non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            attrs.insert(name.into(), value.into());
        }
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs.shift_remove(name),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Text
    // ═══════════════════════════════════════════════════════════════════

    /// Replace the node's entire content with a single text node.
    ///
    /// For a text node, its data is replaced instead.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        let text = text.into();
        if let NodeKind::Text(data) = &mut self.nodes[id.0].kind {
            *data = text;
            return;
        }
        for child in self.nodes[id.0].children.clone() {
            self.remove(child);
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t);
        }
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text(t) = &self.nodes[node.0].kind {
                out.push_str(t);
            }
        }
        out
    }

    // ═══════════════════════════════════════════════════════════════════
    // Diagnostics
    // ═══════════════════════════════════════════════════════════════════

    /// Readable path from the outermost ancestor, e.g. `body > ul#list > li`.
    pub fn describe(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            match &self.nodes[node.0].kind {
                NodeKind::Document => break,
                NodeKind::Text(_) => parts.push("#text".to_string()),
                NodeKind::Element { tag, attrs } => {
                    let mut part = tag.clone();
                    if let Some(id_attr) = attrs.get("id") {
                        part.push('#');
                        part.push_str(id_attr);
                    }
                    parts.push(part);
                }
            }
            current = self.nodes[node.0].parent;
        }
        parts.reverse();
        parts.join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let ul = doc.create_element("UL");
        let li = doc.create_element("li");
        let root = doc.root();
        doc.append_child(root, ul);
        doc.append_child(ul, li);
        (doc, ul, li)
    }

    #[test]
    fn test_deep_clone_is_detached_copy() {
        let (mut doc, ul, li) = list_doc();
        doc.set_attr(li, "class", "item");
        doc.set_text(li, "one");

        let copy = doc.deep_clone(ul);
        assert_ne!(copy, ul);
        assert_eq!(doc.parent(copy), None);
        let li_copy = doc.element_children(copy)[0];
        assert_eq!(doc.attr(li_copy, "class"), Some("item"));
        assert_eq!(doc.text_content(copy), "one");

        // Mutating the copy leaves the original alone
        doc.set_attr(li_copy, "class", "changed");
        assert_eq!(doc.attr(li, "class"), Some("item"));
    }

    #[test]
    fn test_insert_after_and_detach() {
        let (mut doc, ul, li) = list_doc();
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        assert!(doc.insert_after(li, a));
        assert!(doc.insert_after(a, b));
        assert_eq!(doc.children(ul), &[li, a, b]);

        doc.detach(li);
        assert_eq!(doc.children(ul), &[a, b]);
        assert!(!doc.is_attached(li));

        let orphan = doc.create_element("p");
        assert!(!doc.insert_after(li, orphan));
    }

    #[test]
    fn test_set_text_replaces_children() {
        let (mut doc, ul, _li) = list_doc();
        doc.set_text(ul, "plain");
        assert_eq!(doc.element_children(ul), Vec::<NodeId>::new());
        assert_eq!(doc.text_content(ul), "plain");
    }

    #[test]
    fn test_describe() {
        let (mut doc, ul, li) = list_doc();
        doc.set_attr(ul, "id", "list");
        assert_eq!(doc.describe(li), "ul#list > li");
        assert_eq!(doc.tag(ul), Some("ul"));
    }

    #[test]
    fn test_deep_clone_handles_long_chains() {
        let mut doc = Document::new();
        let top = doc.create_element("div");
        let mut current = top;
        for _ in 0..100_000 {
            let next = doc.create_element("i");
            doc.append_child(current, next);
            current = next;
        }
        doc.set_text(current, "leaf");

        let copy = doc.deep_clone(top);
        assert_eq!(doc.descendants(copy).len(), 100_002);
        assert_eq!(doc.text_content(copy), "leaf");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let (mut doc, ul, li) = list_doc();
        let second = doc.create_element("li");
        doc.append_child(ul, second);
        doc.set_text(li, "a");
        let text = doc.children(li)[0];
        assert_eq!(doc.descendants(ul), vec![ul, li, text, second]);
    }
}
