//! Binary operation evaluation

use std::cmp::Ordering;

use crate::error::type_name;
use crate::expr::ast::BinaryOp;
use crate::expr::Expr;
use crate::{EvalError, Value};

use super::unary::to_number;
use super::{Evaluate, Scope};

/// Evaluate an infix operator.
///
/// `&&` and `||` short-circuit and return one of their operands, not a
/// boolean. Both equality spellings compare strictly and structurally.
pub fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    scope: &Scope<'_>,
) -> Result<Value, EvalError> {
    // Short-circuit evaluation for && and ||
    match op {
        BinaryOp::And => {
            let l = left.eval(scope)?;
            return if l.is_truthy() { right.eval(scope) } else { Ok(l) };
        }
        BinaryOp::Or => {
            let l = left.eval(scope)?;
            return if l.is_truthy() { Ok(l) } else { right.eval(scope) };
        }
        _ => {}
    }

    let l = left.eval(scope)?;
    let r = right.eval(scope)?;

    match op {
        BinaryOp::Add => eval_add(&l, &r),
        BinaryOp::Sub => arithmetic(op, &l, &r, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, &l, &r, |a, b| a * b),
        BinaryOp::Div => arithmetic(op, &l, &r, |a, b| a / b),
        BinaryOp::Rem => arithmetic(op, &l, &r, |a, b| a % b),

        BinaryOp::Eq => Ok(Value::Bool(l == r)),
        BinaryOp::Ne => Ok(Value::Bool(l != r)),

        BinaryOp::Lt => compare(op, &l, &r).map(|o| Value::Bool(o == Some(Ordering::Less))),
        BinaryOp::Le => compare(op, &l, &r)
            .map(|o| Value::Bool(matches!(o, Some(Ordering::Less | Ordering::Equal)))),
        BinaryOp::Gt => compare(op, &l, &r).map(|o| Value::Bool(o == Some(Ordering::Greater))),
        BinaryOp::Ge => compare(op, &l, &r)
            .map(|o| Value::Bool(matches!(o, Some(Ordering::Greater | Ordering::Equal)))),

        // Logical (already handled above with short-circuit)
        BinaryOp::And | BinaryOp::Or => unreachable!(),
    }
}

/// `+` concatenates when either side is a string, otherwise adds.
fn eval_add(l: &Value, r: &Value) -> Result<Value, EvalError> {
    if l.is_string() || r.is_string() {
        return Ok(Value::string(format!("{}{}", l, r)));
    }
    arithmetic(BinaryOp::Add, l, r, |a, b| a + b)
}

fn arithmetic(
    op: BinaryOp,
    l: &Value,
    r: &Value,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    let a = to_number(l, op.symbol())?;
    let b = to_number(r, op.symbol())?;
    Ok(Value::Number(f(a, b)))
}

/// Order two numbers or two strings. `None` means unordered (NaN).
fn compare(op: BinaryOp, l: &Value, r: &Value) -> Result<Option<Ordering>, EvalError> {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => Ok(a.partial_cmp(b)),
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        _ => Err(EvalError::type_error(format!(
            "cannot compare {} {} {}",
            type_name(l),
            op.symbol(),
            type_name(r)
        ))),
    }
}
