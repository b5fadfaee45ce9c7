//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create an array value
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    /// Create an object value
    pub fn object(fields: Object) -> Self {
        Value::Object(Arc::new(fields))
    }

    /// Create an object value from `(key, value)` pairs
    pub fn object_from<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap a native function
    pub fn function(func: Function) -> Self {
        Value::Function(func)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if value is callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Truthiness as used by `!`, `&&`, `||` and `?:`.
    ///
    /// Falsy: `undefined`, `null`, `false`, `0`, `NaN` and the empty string.
    /// Everything else, including empty arrays and objects, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a non-negative integral number as an index
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract array as slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extract object properties
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(fields) => Some(fields.as_ref()),
            _ => None,
        }
    }

    /// Extract function
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Read a property the way a member expression does.
    ///
    /// Objects yield the stored value or `undefined`; arrays and strings
    /// expose `length`; arrays also accept numeric keys. Returns `None`
    /// only for `null`/`undefined` bases, which cannot have properties.
    pub fn get_property(&self, key: &str) -> Option<Value> {
        match self {
            Value::Undefined | Value::Null => None,
            Value::Object(fields) => Some(fields.get(key).cloned().unwrap_or_default()),
            Value::Array(items) => {
                if key == "length" {
                    return Some(Value::Number(items.len() as f64));
                }
                let item = key.parse::<usize>().ok().and_then(|i| items.get(i));
                Some(item.cloned().unwrap_or_default())
            }
            Value::String(s) if key == "length" => {
                Some(Value::Number(s.chars().count() as f64))
            }
            _ => Some(Value::Undefined),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,

            // Collections compare structurally
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,

            // Functions are equal if they share the same pointer
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(&a.func, &b.func),

            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::new(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Object> for Value {
    fn from(fields: Object) -> Self {
        Value::object(fields)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("false").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::object(Object::new()).is_truthy());
    }

    #[test]
    fn test_get_property() {
        let obj = Value::object_from([("name", Value::from("Alice"))]);
        assert_eq!(obj.get_property("name"), Some(Value::from("Alice")));
        assert_eq!(obj.get_property("age"), Some(Value::Undefined));

        let arr = Value::from(vec![Value::from(1), Value::from(2)]);
        assert_eq!(arr.get_property("length"), Some(Value::from(2)));
        assert_eq!(arr.get_property("1"), Some(Value::from(2)));

        assert_eq!(Value::from("héllo").get_property("length"), Some(Value::from(5)));
        assert_eq!(Value::Null.get_property("x"), None);
    }
}
