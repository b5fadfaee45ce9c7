//! Unary operation evaluation

use crate::error::type_name;
use crate::expr::ast::UnaryOp;
use crate::expr::Expr;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

/// Evaluate a prefix operator.
pub fn eval_unary(op: UnaryOp, operand: &Expr, scope: &Scope<'_>) -> Result<Value, EvalError> {
    let operand = operand.eval(scope)?;
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Neg => to_number(&operand, "-").map(|n| Value::Number(-n)),
        UnaryOp::Plus => to_number(&operand, "+").map(Value::Number),
    }
}

/// Numeric view of an operand for arithmetic.
///
/// Booleans count as 0/1 and `null` as 0; strings, arrays, objects and
/// `undefined` are rejected rather than silently turning into `NaN`.
pub(crate) fn to_number(value: &Value, op: &str) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Null => Ok(0.0),
        other => Err(EvalError::type_error(format!(
            "cannot apply `{}` to {}",
            op,
            type_name(other)
        ))),
    }
}
