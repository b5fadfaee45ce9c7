//! Array literal evaluation

use crate::expr::Expr;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

/// Evaluate `[a, b, ...]`, elements left to right.
pub fn eval_array(items: &[Expr], scope: &Scope<'_>) -> Result<Value, EvalError> {
    let values = items
        .iter()
        .map(|item| item.eval(scope))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::array(values))
}
