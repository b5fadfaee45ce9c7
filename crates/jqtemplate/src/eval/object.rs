//! Object literal evaluation

use crate::expr::Expr;
use crate::value::Object;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

/// Evaluate `{key: value, ...}` in source order.
///
/// A repeated key keeps its first position and its last value.
pub fn eval_object(fields: &[(String, Expr)], scope: &Scope<'_>) -> Result<Value, EvalError> {
    let mut object = Object::with_capacity(fields.len());
    for (key, expr) in fields {
        object.insert(key.clone(), expr.eval(scope)?);
    }
    Ok(Value::object(object))
}
