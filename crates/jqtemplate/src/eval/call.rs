//! Function call evaluation

use crate::error::type_name;
use crate::expr::Expr;
use crate::value::Invocation;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

/// Evaluate `callee(args...)`.
///
/// Arguments are evaluated left to right before the call. Calls made from
/// inside an expression have no receiver.
///
/// # Errors
///
/// Returns `NotCallable` if the callee is not a function, or whatever
/// error the function itself reports.
pub fn eval_call(callee: &Expr, args: &[Expr], scope: &Scope<'_>) -> Result<Value, EvalError> {
    let func = callee.eval(scope)?;
    let Value::Function(func) = func else {
        return Err(EvalError::NotCallable {
            type_name: type_name(&func).to_string(),
        });
    };

    let args = args
        .iter()
        .map(|a| a.eval(scope))
        .collect::<Result<Vec<_>, _>>()?;
    func.call(&mut Invocation::new(&args))
}
