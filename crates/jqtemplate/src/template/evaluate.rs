//! Directive evaluation
//!
//! The evaluator walks an instance tree in lock-step with its template.
//! The template supplies compiled directives (looked up by template node id);
//! the instance receives every mutation. Per node, directives apply in the
//! order loop, bind, attr, text, then children.

use tracing::{debug, trace};

use super::compile::CompiledFragment;
use super::directive::Directive;
use crate::context::Context;
use crate::dom::{Document, Handler, NodeId, MAX_ELEMENT_DEPTH};
use crate::error::{type_name, Result, TemplateError};
use crate::expr::CompiledExpr;
use crate::value::{Object, Value};

/// Applies a compiled fragment to instance nodes of one document.
pub struct Evaluator<'a> {
    document: &'a mut Document,
    compiled: &'a CompiledFragment,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over `document` using directives from `compiled`.
    pub fn new(document: &'a mut Document, compiled: &'a CompiledFragment) -> Self {
        Self {
            document,
            compiled,
            depth: 0,
        }
    }

    /// Evaluate `instance` against `template`.
    ///
    /// Returns the nodes now standing where `instance` was: the instance
    /// itself, or the replicas when the instance was a loop placeholder
    /// (possibly none).
    ///
    /// # Errors
    ///
    /// The first failing directive aborts the walk. Mutations already made
    /// stay in place. Walking deeper than [`MAX_ELEMENT_DEPTH`] elements
    /// is a `Nesting` error.
    pub fn evaluate(
        &mut self,
        context: &mut Context,
        instance: NodeId,
        template: NodeId,
    ) -> Result<Vec<NodeId>> {
        if self.depth >= MAX_ELEMENT_DEPTH {
            return Err(TemplateError::Nesting {
                node: self.document.describe(instance),
                limit: MAX_ELEMENT_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.evaluate_at(context, instance, template);
        self.depth -= 1;
        result
    }

    fn evaluate_at(
        &mut self,
        context: &mut Context,
        instance: NodeId,
        template: NodeId,
    ) -> Result<Vec<NodeId>> {
        if let Some(expr) = self.directive(template, Directive::Loop) {
            return self.evaluate_loop(context, instance, template, expr);
        }
        self.evaluate_node(context, instance, template)?;
        Ok(vec![instance])
    }

    fn directive(&self, template: NodeId, directive: Directive) -> Option<&'a CompiledExpr> {
        let compiled: &'a CompiledFragment = self.compiled;
        compiled.get(template)?.get(directive)
    }

    /// Everything after the loop step: bind, attr, text, children.
    fn evaluate_node(
        &mut self,
        context: &mut Context,
        instance: NodeId,
        template: NodeId,
    ) -> Result<()> {
        trace!(instance = %instance, template = %template, "evaluate node");

        if let Some(expr) = self.directive(template, Directive::Bind) {
            let value = self.invoke(expr, context, instance, Directive::Bind)?;
            self.apply_bind(instance, value)?;
        }
        if let Some(expr) = self.directive(template, Directive::Attr) {
            let value = self.invoke(expr, context, instance, Directive::Attr)?;
            self.apply_attr(instance, value)?;
        }
        if let Some(expr) = self.directive(template, Directive::Text) {
            let value = self.invoke(expr, context, instance, Directive::Text)?;
            self.document.set_text(instance, value.to_string());
        }

        let instance_children = self.document.element_children(instance);
        let template_children = self.document.element_children(template);
        for (child, child_template) in instance_children.into_iter().zip(template_children) {
            self.evaluate(context, child, child_template)?;
        }
        Ok(())
    }

    fn invoke(
        &self,
        expr: &CompiledExpr,
        context: &Context,
        instance: NodeId,
        directive: Directive,
    ) -> Result<Value> {
        expr.call(context)
            .map_err(|source| TemplateError::Evaluation {
                node: self.document.describe(instance),
                directive,
                source,
            })
    }

    fn shape_error(&self, instance: NodeId, directive: Directive, message: String) -> TemplateError {
        TemplateError::Shape {
            node: self.document.describe(instance),
            directive,
            message,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Loop
    // ═══════════════════════════════════════════════════════════════════

    fn evaluate_loop(
        &mut self,
        context: &mut Context,
        placeholder: NodeId,
        template: NodeId,
        expr: &CompiledExpr,
    ) -> Result<Vec<NodeId>> {
        let value = self.invoke(expr, context, placeholder, Directive::Loop)?;
        let (items, object) = self.loop_shape(placeholder, value)?;

        self.document.remove_attr(placeholder, Directive::Loop.attribute());
        if !items.is_empty() && self.document.parent(placeholder).is_none() {
            return Err(TemplateError::Configuration {
                message: format!(
                    "{} placeholder {} has no parent to insert replicas into",
                    Directive::Loop,
                    self.document.describe(placeholder)
                ),
            });
        }
        debug!(node = %self.document.describe(placeholder), %object, count = items.len(), "loop");

        let mut replicas = Vec::with_capacity(items.len());
        let mut anchor = placeholder;
        for item in items.iter() {
            context.set(object.as_str(), item.clone());
            // Each replica starts from the untouched placeholder
            let replica = self.document.deep_clone(placeholder);
            self.document.insert_after(anchor, replica);
            anchor = replica;
            self.evaluate_node(context, replica, template)?;
            replicas.push(replica);
        }

        self.document.remove(placeholder);
        Ok(replicas)
    }

    fn loop_shape(&self, placeholder: NodeId, value: Value) -> Result<(Vec<Value>, String)> {
        let fields: &Object = value.as_object().ok_or_else(|| {
            self.shape_error(
                placeholder,
                Directive::Loop,
                format!("expected {{array, object}}, got {}", type_name(&value)),
            )
        })?;
        let items = match fields.get("array") {
            Some(Value::Array(items)) => items.as_ref().clone(),
            other => {
                return Err(self.shape_error(
                    placeholder,
                    Directive::Loop,
                    format!(
                        "`array` must be an array, got {}",
                        type_name(other.unwrap_or(&Value::Undefined))
                    ),
                ))
            }
        };
        let object = match fields.get("object") {
            Some(Value::String(name)) => name.as_ref().clone(),
            other => {
                return Err(self.shape_error(
                    placeholder,
                    Directive::Loop,
                    format!(
                        "`object` must be a string, got {}",
                        type_name(other.unwrap_or(&Value::Undefined))
                    ),
                ))
            }
        };
        Ok((items, object))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Bind / Attr
    // ═══════════════════════════════════════════════════════════════════

    fn apply_bind(&mut self, instance: NodeId, value: Value) -> Result<()> {
        let entries = match &value {
            Value::Array(items) => items.as_ref().clone(),
            Value::Object(_) => vec![value.clone()],
            other => {
                return Err(self.shape_error(
                    instance,
                    Directive::Bind,
                    format!("expected a binding or an array of bindings, got {}", type_name(other)),
                ))
            }
        };

        for entry in entries {
            let handler = self.handler(instance, &entry)?;
            self.document.bind(instance, handler);
        }
        Ok(())
    }

    fn handler(&self, instance: NodeId, entry: &Value) -> Result<Handler> {
        let Some(fields) = entry.as_object() else {
            return Err(self.shape_error(
                instance,
                Directive::Bind,
                format!("binding must be an object, got {}", type_name(entry)),
            ));
        };
        let event = match fields.get("event") {
            Some(Value::String(event)) => event.as_ref().clone(),
            other => {
                return Err(self.shape_error(
                    instance,
                    Directive::Bind,
                    format!(
                        "`event` must be a string, got {}",
                        type_name(other.unwrap_or(&Value::Undefined))
                    ),
                ))
            }
        };
        let function = match fields.get("fn") {
            Some(Value::Function(function)) => function.clone(),
            other => {
                return Err(self.shape_error(
                    instance,
                    Directive::Bind,
                    format!(
                        "`fn` for event `{}` must be a function, got {}",
                        event,
                        type_name(other.unwrap_or(&Value::Undefined))
                    ),
                ))
            }
        };
        let args = match fields.get("args") {
            None | Some(Value::Undefined | Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.as_ref().clone(),
            Some(single) => vec![single.clone()],
        };
        Ok(Handler::new(event, function, args))
    }

    fn apply_attr(&mut self, instance: NodeId, value: Value) -> Result<()> {
        let Some(fields) = value.as_object() else {
            return Err(self.shape_error(
                instance,
                Directive::Attr,
                format!("expected an object of attributes, got {}", type_name(&value)),
            ));
        };
        for (name, value) in fields {
            if value.is_nullish() {
                self.document.remove_attr(instance, name);
            } else {
                self.document.set_attr(instance, name.as_str(), value.to_string());
            }
        }
        Ok(())
    }
}
