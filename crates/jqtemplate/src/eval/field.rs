//! Member expression evaluation

use crate::expr::Expr;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

/// Evaluate `object.property`.
///
/// `$this.name` reads the context directly instead of materializing the
/// whole context as an object first.
///
/// # Errors
///
/// Returns `NullProperty` if the base is `null` or `undefined`.
pub fn eval_member(object: &Expr, property: &str, scope: &Scope<'_>) -> Result<Value, EvalError> {
    if let Expr::This = object {
        return Ok(scope.this.get(property).cloned().unwrap_or_default());
    }

    let base = object.eval(scope)?;
    read_property(&base, property)
}

/// Read `property` of `base` with member-expression semantics.
pub(crate) fn read_property(base: &Value, property: &str) -> Result<Value, EvalError> {
    base.get_property(property)
        .ok_or_else(|| EvalError::NullProperty {
            property: property.to_string(),
            base: if matches!(base, Value::Null) {
                "null"
            } else {
                "undefined"
            },
        })
}
