//! Standard prelude with built-in functions

use super::Environment;
use crate::error::{type_name, EvalError};
use crate::value::{Function, Invocation, Value};

impl Environment {
    /// Create an environment with the standard built-in functions.
    pub fn with_prelude() -> Self {
        let mut env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard prelude into this environment.
    pub fn load_prelude(&mut self) {
        // Conversions
        self.define_function(Function::with_arity("String", 1, builtin_string));
        self.define_function(Function::with_arity("Number", 1, builtin_number));
        self.define_function(Function::with_arity("json", 1, builtin_json));

        // Inspection
        self.define_function(Function::with_arity("len", 1, builtin_len));
        self.define_function(Function::with_arity("type_of", 1, builtin_type_of));

        // Strings
        self.define_function(Function::with_arity("upper", 1, builtin_upper));
        self.define_function(Function::with_arity("lower", 1, builtin_lower));
        self.define_function(Function::with_arity("trim", 1, builtin_trim));
        self.define_function(Function::new("join", builtin_join));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn native(function: &str, message: impl Into<String>) -> EvalError {
    EvalError::Native {
        function: function.to_string(),
        message: message.into(),
    }
}

fn builtin_string(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    Ok(Value::string(inv.arg(0).to_string()))
}

fn builtin_number(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    let n = match inv.arg(0) {
        Value::Number(n) => n,
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Null => 0.0,
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                0.0
            } else {
                t.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    };
    Ok(Value::Number(n))
}

fn builtin_json(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    Ok(Value::string(inv.arg(0).to_json().to_string()))
}

fn builtin_len(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    match inv.arg(0) {
        Value::String(s) => Ok(Value::from(s.chars().count())),
        Value::Array(items) => Ok(Value::from(items.len())),
        Value::Object(fields) => Ok(Value::from(fields.len())),
        other => Err(native("len", format!("cannot take length of {}", type_name(&other)))),
    }
}

fn builtin_type_of(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    Ok(Value::from(type_name(&inv.arg(0))))
}

fn builtin_upper(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    Ok(Value::string(inv.arg(0).to_string().to_uppercase()))
}

fn builtin_lower(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    Ok(Value::string(inv.arg(0).to_string().to_lowercase()))
}

fn builtin_trim(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    Ok(Value::string(inv.arg(0).to_string().trim()))
}

fn builtin_join(inv: &mut Invocation<'_>) -> Result<Value, EvalError> {
    let items = match inv.arg(0) {
        Value::Array(items) => items,
        other => return Err(native("join", format!("expected array, got {}", type_name(&other)))),
    };
    let sep = match inv.arg(1) {
        Value::Undefined => ",".to_string(),
        other => other.to_string(),
    };
    Ok(Value::string(
        items
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(&sep),
    ))
}
