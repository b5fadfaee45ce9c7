//! Directive compilation
//!
//! Compilation walks a fragment depth-first, pre-order, and turns every
//! directive attribute into a [`CompiledExpr`] stored against the template
//! node's id. The tree itself is never touched.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::directive::{Directive, DirectiveSet};
use crate::dom::{Document, NodeId, MAX_ELEMENT_DEPTH};
use crate::error::{Result, TemplateError};
use crate::expr::ExpressionEngine;

/// Compiled directives of one fragment, keyed by template node.
#[derive(Debug, Clone, Default)]
pub struct CompiledFragment {
    directives: HashMap<NodeId, DirectiveSet>,
}

impl CompiledFragment {
    /// Directives attached to a template node, if it carries any.
    pub fn get(&self, node: NodeId) -> Option<&DirectiveSet> {
        self.directives.get(&node)
    }

    /// Number of template nodes carrying at least one directive.
    pub fn node_count(&self) -> usize {
        self.directives.len()
    }

    /// Total number of compiled directives.
    pub fn directive_count(&self) -> usize {
        self.directives.values().map(DirectiveSet::len).sum()
    }

    /// Compile every directive under (and including) `root`.
    ///
    /// # Errors
    ///
    /// Returns `Compile` for the first attribute whose text does not parse,
    /// or `Nesting` when the fragment is deeper than [`MAX_ELEMENT_DEPTH`].
    /// Nothing is kept from a failed compilation.
    pub fn compile(
        document: &Document,
        root: NodeId,
        engine: &dyn ExpressionEngine,
    ) -> Result<Self> {
        let mut compiled = Self::default();
        compiled.visit(document, root, engine, 1)?;
        Ok(compiled)
    }

    fn visit(
        &mut self,
        document: &Document,
        node: NodeId,
        engine: &dyn ExpressionEngine,
        depth: usize,
    ) -> Result<()> {
        trace!(node = %node, depth, "compile node");
        if depth > MAX_ELEMENT_DEPTH {
            return Err(TemplateError::Nesting {
                node: document.describe(node),
                limit: MAX_ELEMENT_DEPTH,
            });
        }
        let mut set = DirectiveSet::new();
        for directive in Directive::ALL {
            let Some(source) = document.attr(node, directive.attribute()) else {
                continue;
            };
            let expr = engine
                .compile(source)
                .map_err(|source| TemplateError::Compile {
                    node: document.describe(node),
                    directive,
                    source,
                })?;
            debug!(node = %document.describe(node), %directive, source = %expr.source(), "compiled directive");
            set.insert(directive, expr);
        }
        if !set.is_empty() {
            self.directives.insert(node, set);
        }

        for child in document.element_children(node) {
            self.visit(document, child, engine, depth + 1)?;
        }
        Ok(())
    }
}
