//! The data context exposed to expressions as `$this`

use std::sync::Arc;

use crate::error::TemplateError;
use crate::value::{Object, Value};

/// Mutable name → value mapping threaded through one render call.
///
/// Loop directives overwrite a property on every iteration; there is no
/// per-iteration copy, so the value left behind after a render is the last
/// element of the last loop that bound that name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    properties: Object,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when `json` is not an object (or `null`,
    /// which yields an empty context).
    pub fn from_json(json: serde_json::Value) -> Result<Self, TemplateError> {
        match Value::from(json) {
            Value::Null => Ok(Self::new()),
            Value::Object(fields) => Ok(Self {
                properties: Arc::unwrap_or_clone(fields),
            }),
            other => Err(TemplateError::Configuration {
                message: format!(
                    "model must be a JSON object, got {}",
                    crate::error::type_name(&other)
                ),
            }),
        }
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Builder form of [`Context::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.shift_remove(key)
    }

    /// Check if a property exists.
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Iterate over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the context has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Snapshot the context as an object value (what `$this` evaluates to).
    pub fn to_value(&self) -> Value {
        Value::object(self.properties.clone())
    }
}

impl From<Object> for Context {
    fn from(properties: Object) -> Self {
        Self { properties }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overwrite_in_place() {
        let mut ctx = Context::new().with("it", 1);
        ctx.set("it", 2);
        assert_eq!(ctx.get("it"), Some(&Value::from(2)));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let ctx = Context::from_json(json!({"name": "Alice", "items": [1, 2]})).unwrap();
        assert_eq!(ctx.get("name"), Some(&Value::from("Alice")));
        assert!(ctx.contains("items"));

        assert!(Context::from_json(json!(null)).unwrap().is_empty());
        assert!(matches!(
            Context::from_json(json!([1])),
            Err(TemplateError::Configuration { .. })
        ));
    }
}
