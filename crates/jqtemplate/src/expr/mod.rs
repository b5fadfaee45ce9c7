//! Directive expressions: the pluggable compile step and the default interpreter
//!
//! Directive attributes hold expression text. The template compiler never
//! interprets that text itself; it hands it to an [`ExpressionEngine`],
//! which turns it into a [`CompiledExpr`] callable. Hosts that want a
//! different expression language implement the trait; everyone else uses
//! [`Interpreter`], which parses once and walks the syntax tree on every
//! call.

pub mod ast;
pub mod lexer;
pub mod parser;

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::environment::Environment;
use crate::error::{EvalError, ParseError};
use crate::eval::{Evaluate, Scope};
use crate::value::Value;

pub use ast::Expr;
pub use parser::{parse, MAX_EXPRESSION_DEPTH};

/// Function pointer behind a compiled expression.
pub type ExprFn = Arc<dyn Fn(&Context) -> Result<Value, EvalError> + Send + Sync>;

/// A callable `(context) -> value` compiled from one attribute's text.
///
/// Cloning shares the underlying function.
#[derive(Clone)]
pub struct CompiledExpr {
    source: Arc<str>,
    func: ExprFn,
}

impl CompiledExpr {
    /// Wrap a function together with the text it was compiled from.
    pub fn new<F>(source: &str, func: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            source: Arc::from(source),
            func: Arc::new(func),
        }
    }

    /// Evaluate against the context.
    pub fn call(&self, context: &Context) -> Result<Value, EvalError> {
        (self.func)(context)
    }

    /// The expression text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompiledExpr({:?})", self.source())
    }
}

/// Capability that turns expression text into a callable.
pub trait ExpressionEngine: Send + Sync {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if `source` is not a valid expression.
    fn compile(&self, source: &str) -> Result<CompiledExpr, ParseError>;
}

/// The default engine: parse to an [`Expr`] tree, evaluate by tree walking.
///
/// Bare identifiers resolve against the context first, then against the
/// interpreter's [`Environment`].
///
/// # Example
///
/// ```
/// use jqtemplate::{Context, ExpressionEngine, Interpreter, Value};
///
/// let interp = Interpreter::new();
/// let expr = interp.compile("upper($this.name) + '!'").unwrap();
///
/// let ctx = Context::new().with("name", "alice");
/// assert_eq!(expr.call(&ctx).unwrap(), Value::from("ALICE!"));
/// ```
#[derive(Debug, Clone)]
pub struct Interpreter {
    env: Arc<Environment>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter whose environment holds the standard prelude.
    pub fn new() -> Self {
        Self::with_environment(Environment::with_prelude())
    }

    /// An interpreter with a caller-built environment.
    pub fn with_environment(env: Environment) -> Self {
        Self { env: Arc::new(env) }
    }

    /// The environment bare identifiers fall back to.
    pub fn environment(&self) -> &Environment {
        &self.env
    }
}

impl ExpressionEngine for Interpreter {
    fn compile(&self, source: &str) -> Result<CompiledExpr, ParseError> {
        let expr = parse(source)?;
        let env = Arc::clone(&self.env);
        Ok(CompiledExpr::new(source, move |context: &Context| {
            expr.eval(&Scope::new(context, &env))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_expr_sees_context_changes() {
        let interp = Interpreter::new();
        let expr = interp.compile("it * 2").unwrap();

        let mut ctx = Context::new().with("it", 1);
        assert_eq!(expr.call(&ctx).unwrap(), Value::from(2));

        ctx.set("it", 5);
        assert_eq!(expr.call(&ctx).unwrap(), Value::from(10));
        assert_eq!(expr.source(), "it * 2");
    }

    #[test]
    fn test_compile_rejects_bad_syntax() {
        let err = Interpreter::new().compile("{array: }").unwrap_err();
        assert_eq!(err.offset, 8);
    }
}
