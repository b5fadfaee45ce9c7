//! Conversions between `serde_json::Value` and runtime values

use std::sync::Arc;

use super::*;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(Arc::new(s)),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Convert to JSON.
    ///
    /// `undefined` and functions have no JSON form and become `null`, as do
    /// non-finite numbers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::String(s) => serde_json::Value::String(s.as_ref().clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_order() {
        let v = Value::from(json!({"z": 1, "a": [true, null, "s"]}));
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        // serde_json without preserve_order sorts keys
        assert_eq!(keys.len(), 2);
        assert_eq!(
            v.get_property("a"),
            Some(Value::from(vec![Value::Bool(true), Value::Null, Value::from("s")]))
        );
    }

    #[test]
    fn test_to_json_integral_numbers() {
        assert_eq!(Value::Number(3.0).to_json(), json!(3));
        assert_eq!(Value::Number(0.5).to_json(), json!(0.5));
        assert_eq!(Value::Number(f64::INFINITY).to_json(), json!(null));
        assert_eq!(Value::Undefined.to_json(), json!(null));
    }
}
