//! Expression language tests against the default interpreter

use jqtemplate::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn model() -> Context {
    Context::from_json(json!({
        "name": "Ada",
        "items": [1, 2, 3],
        "user": {"first": "Grace", "tags": ["a", "b"], "admin": false},
        "zero": 0,
        "nothing": null
    }))
    .unwrap()
}

fn eval(source: &str) -> std::result::Result<Value, EvalError> {
    let expr = Interpreter::new().compile(source).unwrap();
    expr.call(&model())
}

fn ok(source: &str) -> Value {
    eval(source).unwrap_or_else(|e| panic!("{source}: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════
// Literals and Paths
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_literals() {
    assert_eq!(ok("42"), Value::from(42));
    assert_eq!(ok("'it'"), Value::from("it"));
    assert_eq!(ok(r#""a\tb\u0041""#), Value::from("a\tbA"));
    assert_eq!(ok("null"), Value::Null);
    assert_eq!(ok("undefined"), Value::Undefined);
    assert_eq!(
        ok("{array: [1, 'x'], 'quoted key': true, 3: null}"),
        Value::object_from([
            ("array", Value::from(vec![Value::from(1), Value::from("x")])),
            ("quoted key", Value::Bool(true)),
            ("3", Value::Null),
        ])
    );
}

#[test]
fn test_this_and_bare_identifiers() {
    assert_eq!(ok("$this.name"), Value::from("Ada"));
    assert_eq!(ok("name"), Value::from("Ada"));
    assert_eq!(ok("$this.user.first"), Value::from("Grace"));
    assert_eq!(ok("user.tags[1]"), Value::from("b"));
    assert_eq!(ok("user['first']"), Value::from("Grace"));
    assert_eq!(ok("items.length + name.length"), Value::from(6));
    assert_eq!(ok("$this.absent"), Value::Undefined);
    assert_eq!(ok("items[10]"), Value::Undefined);
    assert_eq!(ok("$this").get_property("zero"), Some(Value::from(0)));
}

#[test]
fn test_context_shadows_environment() {
    let env = Environment::with_prelude().with("name", "from env").with("only_env", 7);
    let interp = Interpreter::with_environment(env);
    let ctx = model();
    assert_eq!(interp.compile("name").unwrap().call(&ctx).unwrap(), Value::from("Ada"));
    assert_eq!(interp.compile("only_env").unwrap().call(&ctx).unwrap(), Value::from(7));
}

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_arithmetic_and_concatenation() {
    assert_eq!(ok("1 + 2 * 3 - 4 / 2"), Value::from(5));
    assert_eq!(ok("7 % 4"), Value::from(3));
    assert_eq!(ok("-items[0] + +true"), Value::from(0));
    assert_eq!(ok("'n=' + 1.5"), Value::from("n=1.5"));
    assert_eq!(ok("1 + '1'"), Value::from("11"));
    assert_eq!(ok("'tags: ' + user.tags"), Value::from("tags: a,b"));
    assert_eq!(ok("'x' + nothing + $this.absent"), Value::from("x"));
}

#[test]
fn test_logic_returns_operands() {
    assert_eq!(ok("zero || 'fallback'"), Value::from("fallback"));
    assert_eq!(ok("name && user.first"), Value::from("Grace"));
    assert_eq!(ok("user.admin && missing_fn()"), Value::Bool(false));
    assert_eq!(ok("!nothing"), Value::Bool(true));
    assert_eq!(ok("!![]"), Value::Bool(true));
}

#[test]
fn test_comparison_and_equality() {
    assert_eq!(ok("items.length >= 3 ? 'many' : 'few'"), Value::from("many"));
    assert_eq!(ok("'abc' < 'abd'"), Value::Bool(true));
    assert_eq!(ok("1 == '1'"), Value::Bool(false));
    assert_eq!(ok("[1, {a: 2}] === [1, {a: 2}]"), Value::Bool(true));
    assert_eq!(ok("null != undefined"), Value::Bool(true));
    assert_eq!(ok("true ? false ? 1 : 2 : 3"), Value::from(2));
}

// ═══════════════════════════════════════════════════════════════════════
// Calls and Prelude
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_prelude_calls() {
    assert_eq!(ok("upper(name)"), Value::from("ADA"));
    assert_eq!(ok("join(items, '-')"), Value::from("1-2-3"));
    assert_eq!(ok("join(user.tags)"), Value::from("a,b"));
    assert_eq!(ok("len(user)"), Value::from(3));
    assert_eq!(ok("type_of(nothing)"), Value::from("null"));
    assert_eq!(ok("Number('4') + 1"), Value::from(5));
    assert_eq!(ok("trim('  x ')"), Value::from("x"));
    assert_eq!(ok("json({a: [1, true]})"), Value::from(r#"{"a":[1,true]}"#));
}

#[test]
fn test_host_functions() {
    let env = Environment::with_prelude().with(
        "greet",
        Function::with_arity("greet", 2, |inv| {
            Ok(Value::string(format!("{}, {}!", inv.arg(0), inv.arg(1))))
        }),
    );
    let expr = Interpreter::with_environment(env)
        .compile("greet('Hello', $this.name)")
        .unwrap();
    assert_eq!(expr.call(&model()).unwrap(), Value::from("Hello, Ada!"));
}

// ═══════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_runtime_errors() {
    assert!(matches!(
        eval("$this.missing.prop"),
        Err(EvalError::NullProperty { base: "undefined", .. })
    ));
    assert!(matches!(
        eval("nothing.x"),
        Err(EvalError::NullProperty { base: "null", .. })
    ));
    assert!(matches!(
        eval("no_such_name"),
        Err(EvalError::UndefinedVariable { name }) if name == "no_such_name"
    ));
    assert!(matches!(eval("name()"), Err(EvalError::NotCallable { .. })));
    assert!(matches!(eval("upper()"), Err(EvalError::ArityMismatch { got: 0, .. })));
    assert!(matches!(eval("items - 1"), Err(EvalError::TypeError { .. })));
    assert!(matches!(eval("1 < 'a'"), Err(EvalError::TypeError { .. })));
    assert!(matches!(eval("len(1)"), Err(EvalError::Native { .. })));
}

#[test]
fn test_syntax_errors() {
    for source in ["", "1 +", "$this.", "{a 1}", "'open", "[1, 2", "a ? b", "f(,)"] {
        let err = Interpreter::new().compile(source);
        assert!(err.is_err(), "{source:?} should not compile");
    }
}

#[test]
fn test_stringification() {
    let cases = [
        (Value::Undefined, ""),
        (Value::Null, ""),
        (Value::from(3.0), "3"),
        (Value::from(-0.5), "-0.5"),
        (Value::Bool(false), "false"),
        (Value::from(vec![Value::from(1), Value::Null, Value::from("x")]), "1,,x"),
        (Value::object_from([("a", Value::from(1))]), "[object Object]"),
    ];
    for (value, expected) in cases {
        assert_eq!(value.to_string(), expected);
    }
}
