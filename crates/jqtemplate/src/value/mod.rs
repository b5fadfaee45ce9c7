//! Value representation for expression results and context properties

mod callable;
mod display;
mod impls;
mod json;

pub use callable::{Function, FunctionPtr, Invocation, Receiver};

use indexmap::IndexMap;
use std::sync::Arc;

/// Ordered property map backing object values.
pub type Object = IndexMap<String, Value>;

/// Runtime value produced by directive expressions.
///
/// The model follows the loosely typed values a template author expects:
/// - Scalars: `undefined`, `null`, booleans, numbers and strings
/// - Compounds: arrays and objects, `Arc`-shared so cloning is cheap
/// - Callables: native functions registered by the host
#[derive(Clone, Default)]
pub enum Value {
    /// Missing property or explicit `undefined`
    #[default]
    Undefined,

    /// Explicit `null`
    Null,

    /// `true` or `false`
    Bool(bool),

    /// All numbers are double precision
    Number(f64),

    /// Heap-allocated string
    String(Arc<String>),

    /// Ordered sequence
    Array(Arc<Vec<Value>>),

    /// Ordered name → value mapping
    Object(Arc<Object>),

    /// Native callable, usable as an event handler
    Function(Function),
}
