//! Event handler registry attached to a document

use tracing::debug;

use super::{Document, NodeId};
use crate::error::EvalError;
use crate::value::{Function, Invocation, Value};

/// A function bound to one event on one node, with its extra arguments.
#[derive(Debug, Clone)]
pub struct Handler {
    /// Event name, e.g. `click`
    pub event: String,

    /// Function invoked on dispatch
    pub function: Function,

    /// Arguments passed on every dispatch
    pub args: Vec<Value>,
}

impl Handler {
    /// Create a handler.
    pub fn new(event: impl Into<String>, function: Function, args: Vec<Value>) -> Self {
        Self {
            event: event.into(),
            function,
            args,
        }
    }
}

impl Document {
    /// Register `handler` on `node`. Multiple handlers per event run in
    /// registration order.
    pub fn bind(&mut self, node: NodeId, handler: Handler) {
        debug!(node = %node, event = %handler.event, function = %handler.function.name, "bind");
        self.handlers.entry(node).or_default().push(handler);
    }

    /// Run every handler bound to `event` on `node`, returning their results.
    ///
    /// Each handler receives the node as its receiver. The first failing
    /// handler stops dispatch.
    pub fn trigger(&mut self, node: NodeId, event: &str) -> Result<Vec<Value>, EvalError> {
        let matching: Vec<Handler> = self
            .handlers
            .get(&node)
            .map(|hs| hs.iter().filter(|h| h.event == event).cloned().collect())
            .unwrap_or_default();

        let mut results = Vec::with_capacity(matching.len());
        for handler in matching {
            let mut invocation = Invocation::on(self, node, &handler.args);
            results.push(handler.function.call(&mut invocation)?);
        }
        Ok(results)
    }

    /// Event names bound on `node`, in registration order.
    pub fn handlers(&self, node: NodeId) -> Vec<&str> {
        self.handlers
            .get(&node)
            .map(|hs| hs.iter().map(|h| h.event.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_passes_receiver_and_args() {
        let mut doc = Document::new();
        let button = doc.create_element("button");

        let mark = Function::new("mark", |inv| {
            let label = inv.arg(0).to_string();
            if let Some(rx) = inv.receiver.as_mut() {
                rx.document.set_attr(rx.node, "data-clicked", label);
            }
            Ok(Value::Bool(true))
        });
        doc.bind(button, Handler::new("click", mark, vec![Value::from("yes")]));

        assert_eq!(doc.trigger(button, "click").unwrap(), vec![Value::Bool(true)]);
        assert_eq!(doc.attr(button, "data-clicked"), Some("yes"));
        assert_eq!(doc.trigger(button, "hover").unwrap(), Vec::<Value>::new());
        assert_eq!(doc.handlers(button), vec!["click"]);
    }

    #[test]
    fn test_clone_does_not_copy_handlers() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        doc.bind(a, Handler::new("click", Function::new("noop", |_| Ok(Value::Undefined)), vec![]));
        let b = doc.deep_clone(a);
        assert!(doc.handlers(b).is_empty());
    }

    #[test]
    fn test_remove_releases_subtree_handlers() {
        let mut doc = Document::new();
        let list = doc.create_element("ul");
        let item = doc.create_element("li");
        let root = doc.root();
        doc.append_child(root, list);
        doc.append_child(list, item);
        let noop = Function::new("noop", |_| Ok(Value::Undefined));
        doc.bind(list, Handler::new("focus", noop.clone(), vec![]));
        doc.bind(item, Handler::new("click", noop, vec![]));

        doc.remove(list);
        assert!(doc.children(root).is_empty());
        assert!(doc.handlers(list).is_empty());
        assert!(doc.handlers(item).is_empty());
        assert_eq!(doc.trigger(item, "click").unwrap(), Vec::<Value>::new());
        // The subtree itself is still intact
        assert_eq!(doc.parent(item), Some(list));
    }

    #[test]
    fn test_set_text_releases_replaced_children_handlers() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let b = doc.create_element("b");
        doc.append_child(p, b);
        doc.bind(b, Handler::new("click", Function::new("noop", |_| Ok(Value::Undefined)), vec![]));

        doc.set_text(p, "plain");
        assert!(doc.handlers(b).is_empty());
    }
}
