//! Render configuration

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};
use crate::error::{Result, TemplateError};

/// Where cloned instances are appended.
///
/// Deserializes from a selector string or a numeric node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Root {
    /// First element matching a selector
    Selector(String),
    /// An explicit node
    Node(NodeId),
}

impl Default for Root {
    fn default() -> Self {
        Root::Selector("body".to_string())
    }
}

impl From<&str> for Root {
    fn from(selector: &str) -> Self {
        Root::Selector(selector.to_string())
    }
}

impl From<String> for Root {
    fn from(selector: String) -> Self {
        Root::Selector(selector)
    }
}

impl From<NodeId> for Root {
    fn from(node: NodeId) -> Self {
        Root::Node(node)
    }
}

impl Root {
    /// Resolve to a node of `document`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the selector is invalid or matches
    /// nothing, or the id does not belong to the document.
    pub fn resolve(&self, document: &Document) -> Result<NodeId> {
        match self {
            Root::Selector(selector) => {
                document
                    .select_first(selector)?
                    .ok_or_else(|| TemplateError::Configuration {
                        message: format!("root selector `{}` matched nothing", selector),
                    })
            }
            Root::Node(node) if document.contains(*node) => Ok(*node),
            Root::Node(node) => Err(TemplateError::Configuration {
                message: format!("root node {} is not in the document", node),
            }),
        }
    }
}

/// Options for [`Template::render`](super::Template::render).
///
/// ```
/// use jqtemplate::RenderOptions;
///
/// let opts: RenderOptions = serde_json::from_str(r##"{"root": "#out"}"##).unwrap();
/// assert_eq!(opts, RenderOptions::default().root("#out"));
/// assert!(!opts.inplace);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Evaluate fragments directly instead of cloning them; `root` is ignored
    pub inplace: bool,

    /// Where clones are appended when not in place
    pub root: Root,
}

impl RenderOptions {
    /// Default options: clone into `body`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set in-place mode.
    pub fn inplace(mut self, inplace: bool) -> Self {
        self.inplace = inplace;
        self
    }

    /// Set the render root.
    pub fn root(mut self, root: impl Into<Root>) -> Self {
        self.root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.root, Root::Selector("body".into()));
        assert!(!opts.inplace);
    }

    #[test]
    fn test_root_accepts_node_ids() {
        let opts: RenderOptions = serde_json::from_str(r#"{"inplace": true, "root": 3}"#).unwrap();
        assert!(opts.inplace);
        assert!(matches!(opts.root, Root::Node(id) if id.index() == 3));
    }

    #[test]
    fn test_resolve_errors() {
        let doc = Document::parse("<p>x</p>").unwrap();
        assert!(Root::from("body").resolve(&doc).is_ok());
        assert!(matches!(
            Root::from("#missing").resolve(&doc),
            Err(TemplateError::Configuration { .. })
        ));
        let far = serde_json::from_str::<Root>("999").unwrap();
        assert!(far.resolve(&doc).is_err());
    }
}
