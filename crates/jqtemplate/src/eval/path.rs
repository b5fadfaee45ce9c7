//! Identifier resolution

use super::Scope;
use crate::{EvalError, Value};

/// Resolve a bare identifier.
///
/// A property of `$this` wins over an environment binding of the same
/// name, which is what lets a loop variable (`it`) be written without the
/// `$this.` prefix.
///
/// # Errors
///
/// Returns `UndefinedVariable` if neither the context nor the environment
/// has the name.
pub fn eval_ident(name: &str, scope: &Scope<'_>) -> Result<Value, EvalError> {
    scope
        .this
        .get(name)
        .or_else(|| scope.env.get(name))
        .cloned()
        .ok_or_else(|| EvalError::UndefinedVariable {
            name: name.to_string(),
        })
}
