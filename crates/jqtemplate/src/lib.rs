//! # jqtemplate
//!
//! Attribute-directive templating over an arena document tree.
//!
//! A template is an inert fragment of markup whose elements carry directive
//! attributes. Rendering compiles those attributes once, then walks a clone
//! of the fragment (or the fragment itself) in lock-step with the original,
//! evaluating each directive against a caller-supplied [`Context`]:
//!
//! | Attribute | Result | Effect |
//! |---|---|---|
//! | `jqloop` | `{array: [..], object: 'name'}` | one replica per element, with `$this.name` bound |
//! | `jqbind` | `{event, fn, args?}` or an array of them | event handlers on the node |
//! | `jqattr` | `{name: value, ..}` | attributes set (or removed for `null`) |
//! | `jqtext` | any value | node content replaced by the value's text |
//!
//! ## Architecture
//!
//! - **Tree** ([`dom`]): arena [`Document`] with parsing, serialization,
//!   selectors and per-node event handlers
//! - **Expressions** ([`expr`], [`eval`]): the [`ExpressionEngine`] seam and
//!   the default tree-walking [`Interpreter`]
//! - **Templates** ([`template`]): compile-once [`Fragment`]s, the
//!   [`Evaluator`], and [`Engine`]/[`Template`] as the entry points
//!
//! ## Example
//!
//! ```
//! use jqtemplate::{Context, Document, Engine, RenderOptions};
//!
//! let mut doc = Document::parse(
//!     r#"<ul id="tpl"><li jqloop="{array: $this.items, object: 'it'}" jqtext="$this.it"></li></ul>"#,
//! ).unwrap();
//! let template = Engine::new().template(&doc, "#tpl").unwrap();
//!
//! let mut ctx = Context::from_json(serde_json::json!({"items": ["a", "b"]})).unwrap();
//! let out = template.render(&mut doc, &mut ctx, &RenderOptions::default()).unwrap();
//!
//! assert_eq!(doc.element_children(out[0]).len(), 2);
//! assert_eq!(doc.text_content(out[0]), "ab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dom;
pub mod environment;
pub mod error;
pub mod eval;
pub mod expr;
pub mod template;
pub mod value;

// Re-export main types
pub use context::Context;
pub use dom::{select::Selector, Attributes, Document, Handler, NodeId, NodeKind, MAX_ELEMENT_DEPTH};
pub use environment::{Binding, Environment};
pub use error::{type_name, EvalError, MarkupError, ParseError, Result, TemplateError};
pub use eval::{eval_expr, Evaluate, Scope};
pub use expr::{parse, CompiledExpr, ExpressionEngine, Expr, Interpreter, MAX_EXPRESSION_DEPTH};
pub use template::{
    CompiledFragment, Directive, DirectiveSet, Engine, Evaluator, Fragment, RenderOptions, Root,
    Template,
};
pub use value::{Function, FunctionPtr, Invocation, Object, Receiver, Value};

/// jqtemplate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
