//! Expression evaluation

pub mod array;
pub mod binary;
pub mod call;
pub mod conditional;
pub mod field;
pub mod index;
pub mod literal;
pub mod object;
pub mod path;
pub mod unary;

use crate::context::Context;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::expr::Expr;
use crate::value::Value;

/// What an expression can see while it runs: `$this` and the environment.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// The context object, `$this`
    pub this: &'a Context,

    /// Fallback for bare identifiers
    pub env: &'a Environment,
}

impl<'a> Scope<'a> {
    /// Create a scope over a context and environment.
    pub fn new(this: &'a Context, env: &'a Environment) -> Self {
        Self { this, env }
    }
}

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter.
pub trait Evaluate {
    /// Evaluate this AST node in the given scope.
    fn eval(&self, scope: &Scope<'_>) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, scope: &Scope<'_>) -> Result<Value, EvalError> {
        match self {
            Expr::Literal(lit) => lit.eval(scope),
            Expr::This => Ok(scope.this.to_value()),
            Expr::Ident(name) => path::eval_ident(name, scope),

            Expr::Member { object, property } => field::eval_member(object, property, scope),
            Expr::Index { object, index } => index::eval_index(object, index, scope),
            Expr::Call { callee, args } => call::eval_call(callee, args, scope),

            Expr::Array(items) => array::eval_array(items, scope),
            Expr::Object(fields) => object::eval_object(fields, scope),

            Expr::Unary { op, operand } => unary::eval_unary(*op, operand, scope),
            Expr::Binary { op, left, right } => binary::eval_binary(*op, left, right, scope),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => conditional::eval_conditional(test, consequent, alternate, scope),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression (convenience wrapper).
pub fn eval_expr(expr: &Expr, this: &Context, env: &Environment) -> Result<Value, EvalError> {
    expr.eval(&Scope::new(this, env))
}
