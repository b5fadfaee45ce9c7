//! Callable values: native functions and event-handler invocation

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::dom::{Document, NodeId};
use crate::error::EvalError;

/// Type alias for native function pointers to reduce complexity
pub type FunctionPtr = Arc<dyn Fn(&mut Invocation<'_>) -> Result<Value, EvalError> + Send + Sync>;

/// The node a function was invoked on.
///
/// Present when the function runs as an event handler; absent when it is
/// called from inside an expression.
pub struct Receiver<'a> {
    /// Document owning the node
    pub document: &'a mut Document,

    /// The node the handler was bound to
    pub node: NodeId,
}

/// Arguments and receiver of a single call.
pub struct Invocation<'a> {
    /// The bound node, for event handlers
    pub receiver: Option<Receiver<'a>>,

    /// Positional arguments
    pub args: &'a [Value],
}

impl<'a> Invocation<'a> {
    /// A plain call with no receiver.
    pub fn new(args: &'a [Value]) -> Self {
        Self {
            receiver: None,
            args,
        }
    }

    /// A call with `node` as receiver.
    pub fn on(document: &'a mut Document, node: NodeId, args: &'a [Value]) -> Self {
        Self {
            receiver: Some(Receiver { document, node }),
            args,
        }
    }

    /// Argument at `index`, or `undefined` when not supplied.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }

    /// The receiver's node id, if any.
    pub fn node(&self) -> Option<NodeId> {
        self.receiver.as_ref().map(|r| r.node)
    }
}

/// A named native function.
#[derive(Clone)]
pub struct Function {
    /// Function name (for display/debugging)
    pub name: String,

    /// Exact arity, or `None` for variadic
    pub arity: Option<usize>,

    /// The actual function pointer
    pub func: FunctionPtr,
}

impl Function {
    /// Create a variadic function.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: None,
            func: Arc::new(func),
        }
    }

    /// Create a function with a fixed arity checked on every call.
    pub fn with_arity<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: Some(arity),
            func: Arc::new(func),
        }
    }

    /// Invoke the function.
    pub fn call(&self, invocation: &mut Invocation<'_>) -> Result<Value, EvalError> {
        if let Some(expected) = self.arity {
            if invocation.args.len() != expected {
                return Err(EvalError::ArityMismatch {
                    function: self.name.clone(),
                    expected,
                    got: invocation.args.len(),
                });
            }
        }
        (self.func)(invocation)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_is_checked() {
        let f = Function::with_arity("double", 1, |inv| match inv.arg(0) {
            Value::Number(n) => Ok(Value::Number(n * 2.0)),
            _ => Ok(Value::Undefined),
        });

        let args = [Value::Number(4.0)];
        assert_eq!(f.call(&mut Invocation::new(&args)).unwrap(), Value::Number(8.0));

        let err = f.call(&mut Invocation::new(&[])).unwrap_err();
        assert!(matches!(err, EvalError::ArityMismatch { expected: 1, got: 0, .. }));
    }

    #[test]
    fn test_missing_arg_is_undefined() {
        let inv = Invocation::new(&[]);
        assert_eq!(inv.arg(3), Value::Undefined);
        assert!(inv.node().is_none());
    }
}
