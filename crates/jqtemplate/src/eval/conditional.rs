//! Conditional (`?:`) evaluation

use crate::expr::Expr;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

/// Evaluate `test ? consequent : alternate`; only the chosen branch runs.
pub fn eval_conditional(
    test: &Expr,
    consequent: &Expr,
    alternate: &Expr,
    scope: &Scope<'_>,
) -> Result<Value, EvalError> {
    if test.eval(scope)?.is_truthy() {
        consequent.eval(scope)
    } else {
        alternate.eval(scope)
    }
}
