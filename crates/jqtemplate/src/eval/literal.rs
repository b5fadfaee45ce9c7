//! Literal evaluation

use crate::expr::ast::Literal;
use crate::{EvalError, Value};

use super::{Evaluate, Scope};

impl Evaluate for Literal {
    fn eval(&self, _scope: &Scope<'_>) -> Result<Value, EvalError> {
        Ok(match self {
            Literal::Undefined => Value::Undefined,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::string(s.as_str()),
        })
    }
}
