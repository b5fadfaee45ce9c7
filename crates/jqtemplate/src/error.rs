//! Error types for expression compilation, evaluation and rendering

use thiserror::Error;

use crate::template::Directive;
use crate::value::Value;

/// Syntax error in a directive expression.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    /// What went wrong
    pub message: String,

    /// Byte offset into the expression source
    pub offset: usize,
}

impl ParseError {
    /// Create a parse error at the given byte offset.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Runtime error raised while evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Identifier is neither a context property nor an environment binding
    #[error("undefined variable `{name}`")]
    UndefinedVariable {
        /// The identifier
        name: String,
    },

    /// Property read on `null` or `undefined`
    #[error("cannot read property `{property}` of {base}")]
    NullProperty {
        /// The property being read
        property: String,
        /// "null" or "undefined"
        base: &'static str,
    },

    /// Operand types don't fit the operation
    #[error("type error: {message}")]
    TypeError {
        /// Description of the mismatch
        message: String,
    },

    /// Attempted to call something that is not a function
    #[error("{type_name} is not a function")]
    NotCallable {
        /// Kind of the value that was called
        type_name: String,
    },

    /// Native function called with the wrong number of arguments
    #[error("{function} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Function name
        function: String,
        /// Declared arity
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// A native function reported a failure
    #[error("{function}: {message}")]
    Native {
        /// Function name
        function: String,
        /// Failure message from the function
        message: String,
    },
}

impl EvalError {
    /// Shorthand for a type error with a formatted message.
    pub fn type_error(message: impl Into<String>) -> Self {
        EvalError::TypeError {
            message: message.into(),
        }
    }
}

/// Markup could not be parsed into a document.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("markup error at offset {offset}: {message}")]
pub struct MarkupError {
    /// What went wrong
    pub message: String,

    /// Byte offset into the markup source
    pub offset: usize,
}

/// Top-level error for template operations.
///
/// Every variant that originates in a directive names the node (as a
/// readable path) and the directive, so a failing render can be traced
/// back to the offending attribute.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A directive attribute is not a valid expression
    #[error("cannot compile {directive} on {node}: {source}")]
    Compile {
        /// Readable path of the template node
        node: String,
        /// The directive being compiled
        directive: Directive,
        /// Underlying syntax error
        #[source]
        source: ParseError,
    },

    /// A compiled directive failed while running
    #[error("{directive} on {node} failed: {source}")]
    Evaluation {
        /// Readable path of the instance node
        node: String,
        /// The directive being evaluated
        directive: Directive,
        /// Underlying runtime error
        #[source]
        source: EvalError,
    },

    /// A directive returned a value its effect cannot use
    #[error("{directive} on {node} produced an unusable value: {message}")]
    Shape {
        /// Readable path of the instance node
        node: String,
        /// The directive being evaluated
        directive: Directive,
        /// What was expected
        message: String,
    },

    /// A fragment nests elements deeper than compilation or evaluation walks
    #[error("{node} is nested deeper than {limit} elements")]
    Nesting {
        /// Readable path of the first node past the limit
        node: String,
        /// The element depth limit
        limit: usize,
    },

    /// Render options or selectors cannot be resolved
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem
        message: String,
    },

    /// Markup parsing failed
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// Result type alias for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Human-readable kind of a value, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Function(_) => "function",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_names_node_and_directive() {
        let err = TemplateError::Compile {
            node: "body > ul > li".to_string(),
            directive: Directive::Text,
            source: ParseError::new("unexpected token `)`", 4),
        };
        let msg = err.to_string();
        assert!(msg.contains("jqtext"));
        assert!(msg.contains("body > ul > li"));
        assert!(msg.contains("offset 4"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&Value::Undefined), "undefined");
        assert_eq!(type_name(&Value::Number(1.0)), "number");
        assert_eq!(type_name(&Value::string("x")), "string");
    }
}
