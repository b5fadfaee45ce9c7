//! Templates: compile directive attributes once, evaluate them per render
//!
//! # Architecture
//!
//! ```text
//! Engine ──template(doc, selector)──▶ Template ── fragments ──▶ Fragment
//!                                        │                       │
//!                                     render                  compile (once)
//!                                        ▼                       ▼
//!                    clone into root ─▶ Evaluator ◀── CompiledFragment
//! ```
//!
//! A [`Fragment`] is one template root inside a [`Document`]. Its compiled
//! directives live in a write-once cell on the fragment itself, keyed by
//! template node id, so every clone and loop replica reuses them.

pub mod compile;
pub mod directive;
pub mod evaluate;
pub mod render;

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{info, instrument};

use crate::context::Context;
use crate::dom::{Document, NodeId};
use crate::environment::Environment;
use crate::error::{Result, TemplateError};
use crate::expr::{ExpressionEngine, Interpreter};

pub use compile::CompiledFragment;
pub use directive::{Directive, DirectiveSet};
pub use evaluate::Evaluator;
pub use render::{RenderOptions, Root};

/// Entry point: owns the expression engine that templates compile with.
#[derive(Clone)]
pub struct Engine {
    expressions: Arc<dyn ExpressionEngine>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Engine")
    }
}

impl Engine {
    /// An engine using the default [`Interpreter`] and prelude.
    pub fn new() -> Self {
        Self::with_expressions(Interpreter::new())
    }

    /// An engine compiling expressions with a custom implementation.
    pub fn with_expressions(expressions: impl ExpressionEngine + 'static) -> Self {
        Self {
            expressions: Arc::new(expressions),
        }
    }

    /// An engine using the default interpreter over `env`.
    pub fn with_environment(env: Environment) -> Self {
        Self::with_expressions(Interpreter::with_environment(env))
    }

    /// Build a template from every element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the selector is invalid or matches nothing.
    pub fn template(&self, document: &Document, selector: &str) -> Result<Template> {
        let roots = document.select(selector)?;
        if roots.is_empty() {
            return Err(TemplateError::Configuration {
                message: format!("template selector `{}` matched nothing", selector),
            });
        }
        Ok(self.fragments(roots))
    }

    /// Build a template from explicit fragment roots.
    pub fn fragments(&self, roots: impl IntoIterator<Item = NodeId>) -> Template {
        Template {
            fragments: roots
                .into_iter()
                .map(|root| Fragment {
                    root,
                    compiled: OnceLock::new(),
                    expressions: Arc::clone(&self.expressions),
                })
                .collect(),
        }
    }
}

/// One template root and its lazily compiled directives.
pub struct Fragment {
    root: NodeId,
    compiled: OnceLock<CompiledFragment>,
    expressions: Arc<dyn ExpressionEngine>,
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("root", &self.root)
            .field("compiled", &self.compiled.get())
            .finish()
    }
}

impl Fragment {
    /// The fragment's root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check if compilation has run.
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Compiled directives, if compilation has run.
    pub fn compiled(&self) -> Option<&CompiledFragment> {
        self.compiled.get()
    }

    /// Compile the fragment's directives, or return the cached result.
    ///
    /// Later calls never consult the document again: attribute edits made
    /// after the first successful compile have no effect.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the root is not in `document`, or
    /// `Compile` for invalid directive text. A failed compile caches nothing.
    #[instrument(skip_all, fields(root = %self.root))]
    pub fn compile(&self, document: &Document) -> Result<&CompiledFragment> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        if !document.contains(self.root) {
            return Err(TemplateError::Configuration {
                message: format!("fragment root {} is not in the document", self.root),
            });
        }
        let compiled = CompiledFragment::compile(document, self.root, self.expressions.as_ref())?;
        Ok(self.compiled.get_or_init(|| compiled))
    }
}

/// A set of fragments rendered together.
#[derive(Debug)]
pub struct Template {
    fragments: Vec<Fragment>,
}

impl Template {
    /// The fragments in selection order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Compile every fragment.
    ///
    /// # Errors
    ///
    /// The first fragment that fails to compile aborts the call.
    pub fn compile(&self, document: &Document) -> Result<()> {
        for fragment in &self.fragments {
            fragment.compile(document)?;
        }
        Ok(())
    }

    /// Total number of compiled directives across compiled fragments.
    pub fn directive_count(&self) -> usize {
        self.fragments
            .iter()
            .filter_map(Fragment::compiled)
            .map(CompiledFragment::directive_count)
            .sum()
    }

    /// Render every fragment against `context`.
    ///
    /// Without `inplace`, each fragment is cloned, appended as the last
    /// child of the resolved root, and the clone is evaluated. With
    /// `inplace`, the fragment itself is evaluated.
    ///
    /// Returns the evaluated instances in fragment order. A fragment whose
    /// root carries `jqloop` contributes its replicas.
    ///
    /// # Errors
    ///
    /// Compile and configuration errors are reported before the document is
    /// touched. Evaluation stops at the first failing directive, leaving
    /// earlier mutations in place.
    ///
    /// # Example
    ///
    /// ```
    /// use jqtemplate::{Context, Document, Engine, RenderOptions};
    ///
    /// let mut doc = Document::parse(
    ///     r#"<template id="t"><p jqtext="$this.greeting"></p></template><main></main>"#,
    /// ).unwrap();
    /// let template = Engine::new().template(&doc, "#t > p").unwrap();
    ///
    /// let mut ctx = Context::new().with("greeting", "hello");
    /// let opts = RenderOptions::new().root("main");
    /// let out = template.render(&mut doc, &mut ctx, &opts).unwrap();
    ///
    /// assert_eq!(doc.describe(out[0]), "body > main > p");
    /// assert_eq!(doc.text_content(out[0]), "hello");
    /// ```
    #[instrument(skip_all, fields(fragments = self.fragments.len(), inplace = options.inplace))]
    pub fn render(
        &self,
        document: &mut Document,
        context: &mut Context,
        options: &RenderOptions,
    ) -> Result<Vec<NodeId>> {
        self.compile(document)?;
        let root = if options.inplace {
            None
        } else {
            Some(options.root.resolve(document)?)
        };

        let mut instances = Vec::new();
        for fragment in &self.fragments {
            let compiled = fragment.compile(document)?;
            let instance = match root {
                Some(root) => {
                    let copy = document.deep_clone(fragment.root);
                    document.append_child(root, copy);
                    copy
                }
                None => fragment.root,
            };
            let produced = Evaluator::new(document, compiled).evaluate(context, instance, fragment.root)?;
            instances.extend(produced);
        }

        info!(instances = instances.len(), "rendered");
        Ok(instances)
    }
}
