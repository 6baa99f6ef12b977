//! String natives: split, replace, trim.

use jihll_vm::{NativeCtx, NativeRegistry, Value};
use regex::Regex;

use super::{arg_str, expect_args};

pub fn register(registry: &mut NativeRegistry) {
    registry.register("split", native_split);
    registry.register("replace", native_replace);
    registry.register("trim", native_trim);
}

/// Splits on a regular expression. Trailing empty pieces are dropped, as is
/// the leading empty piece produced by a zero-width match at the start.
fn native_split(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 2)?;
    let text = arg_str(args, 0)?;
    let re = Regex::new(arg_str(args, 1)?).map_err(|e| e.to_string())?;
    Ok(Value::list(
        split(text, &re).into_iter().map(Value::from).collect(),
    ))
}

fn split<'a>(text: &'a str, re: &Regex) -> Vec<&'a str> {
    let Some(first) = re.find(text) else {
        return vec![text];
    };
    let mut pieces: Vec<&str> = re.split(text).collect();
    if first.start() == 0 && first.is_empty() && pieces.first() == Some(&"") {
        pieces.remove(0);
    }
    while pieces.last() == Some(&"") {
        pieces.pop();
    }
    pieces
}

/// Replaces every literal occurrence.
fn native_replace(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 3)?;
    let text = arg_str(args, 0)?;
    let from = arg_str(args, 1)?;
    let to = arg_str(args, 2)?;
    Ok(Value::from(text.replace(from, to)))
}

fn native_trim(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    Ok(Value::from(arg_str(args, 0)?.trim()))
}

#[cfg(test)]
mod tests {
    use super::super::testing::call;
    use super::*;
    use pretty_assertions::assert_eq;

    fn pieces<'a>(text: &'a str, pattern: &str) -> Vec<&'a str> {
        split(text, &Regex::new(pattern).unwrap())
    }

    #[test]
    fn test_split_drops_trailing_empties() {
        assert_eq!(pieces("a,b,,", ","), vec!["a", "b"]);
        assert_eq!(pieces(",a", ","), vec!["", "a"]);
        assert_eq!(pieces("a1b22c", "[0-9]+"), vec!["a", "b", "c"]);
        assert_eq!(pieces("abc", ""), vec!["a", "b", "c"]);
        assert_eq!(pieces("", ","), vec![""]);
    }

    #[test]
    fn test_split_native() {
        let result = call("split", &[Value::from("x y"), Value::from(" ")]).unwrap();
        assert_eq!(result.to_string(), "[x, y]");
        assert!(call("split", &[Value::from("x"), Value::from("(")]).is_err());
    }

    #[test]
    fn test_replace_and_trim() {
        assert_eq!(
            call(
                "replace",
                &[Value::from("a-b-c"), Value::from("-"), Value::from("+")]
            ),
            Ok(Value::from("a+b+c"))
        );
        assert_eq!(call("trim", &[Value::from("  hi \n")]), Ok(Value::from("hi")));
        assert!(call("trim", &[Value::Number(1.0)]).is_err());
    }
}
