//! Display and Debug implementations for Value
//!
//! `Display` is the stringification used when a value lands in the tree
//! (text content, attribute values). `Debug` prints literal syntax.

use std::fmt;

use super::*;

/// Format a number without a trailing `.0` for integral values.
pub(crate) fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        // -0 prints as 0
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined | Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(*n, f),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}()", func.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(*n, f),
            Value::String(s) => write!(f, "{:?}", s.as_str()),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {:?}", k, v)?;
                }
                if !fields.is_empty() {
                    write!(f, " ")?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "{:?}", func),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_stringification() {
        assert_eq!(Value::Undefined.to_string(), "");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(
            Value::from(vec![Value::from(1), Value::from("a"), Value::Null]).to_string(),
            "1,a,"
        );
        assert_eq!(Value::object(Object::new()).to_string(), "[object Object]");
    }

    #[test]
    fn test_debug_literal_syntax() {
        let v = Value::object_from([
            ("a", Value::from(1)),
            ("b", Value::from(vec![Value::from("x")])),
        ]);
        assert_eq!(format!("{:?}", v), r#"{ a: 1, b: ["x"] }"#);
        assert_eq!(format!("{:?}", Value::object(Object::new())), "{}");
    }
}
