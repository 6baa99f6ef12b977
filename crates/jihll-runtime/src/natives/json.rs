//! JSON natives backed by serde_json.

use indexmap::IndexMap;
use jihll_vm::{MapKey, NativeCtx, NativeRegistry, Value};
use serde_json::Value as Json;

use super::{arg_str, expect_args};

pub fn register(registry: &mut NativeRegistry) {
    registry.register("jsonParse", native_json_parse);
    registry.register("jsonStringify", native_json_stringify);
}

fn native_json_parse(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    let json: Json = serde_json::from_str(arg_str(args, 0)?).map_err(|e| e.to_string())?;
    Ok(from_json(json))
}

fn native_json_stringify(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    let json = to_json(&args[0]);
    serde_json::to_string(&json)
        .map(Value::from)
        .map_err(|e| e.to_string())
}

pub fn from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::from(s),
        Json::Array(items) => Value::list(items.into_iter().map(from_json).collect()),
        Json::Object(fields) => Value::map(
            fields
                .into_iter()
                .map(|(k, v)| (MapKey::from(k.as_str()), from_json(v)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

/// Integral numbers serialize without a fraction. Values with no JSON
/// counterpart (functions, classes, instances) serialize as their textual form.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::Str(s) => Json::String(s.to_string()),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), to_json(v)))
                .collect(),
        ),
        other => Json::String(other.to_string()),
    }
}

fn number_to_json(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Json::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(Json::Number)
        .unwrap_or(Json::Null)
}

#[cfg(test)]
mod tests {
    use super::super::testing::call;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested() {
        let value = call(
            "jsonParse",
            &[Value::from(r#"{"a": [1, 2.5, "x"], "b": null, "c": true}"#)],
        )
        .unwrap();
        assert_eq!(value.to_string(), "{a: [1, 2.5, x], b: null, c: true}");
    }

    #[test]
    fn test_parse_error_is_failure() {
        assert!(call("jsonParse", &[Value::from("{oops")]).is_err());
        assert!(call("jsonParse", &[Value::Number(1.0)]).is_err());
    }

    #[test]
    fn test_stringify() {
        let mut entries = IndexMap::new();
        entries.insert(MapKey::from("n"), Value::Number(3.0));
        entries.insert(MapKey::from("f"), Value::Number(0.5));
        entries.insert(
            MapKey::from("l"),
            Value::list(vec![Value::from("s"), Value::Null]),
        );
        let out = call("jsonStringify", &[Value::map(entries)]).unwrap();
        assert_eq!(out, Value::from(r#"{"n":3,"f":0.5,"l":["s",null]}"#));
    }

    #[test]
    fn test_stringify_non_finite_is_null() {
        assert_eq!(to_json(&Value::Number(f64::INFINITY)), Json::Null);
    }
}
