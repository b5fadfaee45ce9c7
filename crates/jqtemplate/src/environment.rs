//! Host bindings visible to expressions by bare name

mod prelude;

use crate::value::{Function, Value};

/// A single named binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,
}

/// Names an expression can reach besides `$this`.
///
/// Bare identifiers resolve against the context first and fall back to
/// the environment, so the environment holds what the host supplies once
/// for every render: event handlers, helper functions, constants.
/// Redefining a name shadows the earlier binding.
///
/// # Example
///
/// ```
/// use jqtemplate::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("answer", Value::from(42));
/// env.define("answer", Value::from(43)); // shadows
///
/// assert_eq!(env.get("answer"), Some(&Value::from(43)));
/// assert_eq!(env.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// All bindings in a flat array (most recent at end)
    bindings: Vec<Binding>,
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Define a binding, shadowing any earlier one with the same name.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.push(Binding {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Register a native function under its own name.
    pub fn define_function(&mut self, func: Function) {
        let name = func.name.clone();
        self.define(name, Value::Function(func));
    }

    /// Builder form of [`Environment::define`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.define(name, value);
        self
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding by name.
    ///
    /// Returns the most recent binding with the given name (shadowing),
    /// or `None` if not found.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Check if a binding exists.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    /// Iterate over all bindings, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
