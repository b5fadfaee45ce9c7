//! Index expression evaluation

use crate::error::type_name;
use crate::expr::Expr;
use crate::{EvalError, Value};

use super::field::read_property;
use super::{Evaluate, Scope};

/// Evaluate `object[index]`.
///
/// Arrays and strings take integral numeric indices; out-of-range reads
/// give `undefined`. Any other key is converted to a string and read as a
/// property.
///
/// # Errors
///
/// Returns `NullProperty` if the base is `null` or `undefined`, and
/// `TypeError` for an array index that is not a non-negative integer.
pub fn eval_index(object: &Expr, index: &Expr, scope: &Scope<'_>) -> Result<Value, EvalError> {
    let base = object.eval(scope)?;
    let key = index.eval(scope)?;

    match (&base, &key) {
        (Value::Array(items), Value::Number(_)) => {
            let idx = key.as_index().ok_or_else(|| {
                EvalError::type_error(format!("array index must be a non-negative integer, got {:?}", key))
            })?;
            Ok(items.get(idx).cloned().unwrap_or_default())
        }
        (Value::String(s), Value::Number(_)) => {
            let ch = key.as_index().and_then(|i| s.chars().nth(i));
            Ok(ch.map(|c| Value::string(c.to_string())).unwrap_or_default())
        }
        (_, Value::Object(_) | Value::Array(_) | Value::Function(_)) => Err(EvalError::type_error(
            format!("cannot use {} as a property key", type_name(&key)),
        )),
        _ => read_property(&base, &key.to_string()),
    }
}
