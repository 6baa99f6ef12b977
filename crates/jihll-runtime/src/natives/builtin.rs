//! Built-in natives: clock, sleep, len.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jihll_vm::{NativeCtx, NativeRegistry, Value};

use super::{arg_number, expect_args};

pub fn register(registry: &mut NativeRegistry) {
    registry.register("clock", native_clock);
    registry.register("sleep", native_sleep);
    registry.register("len", native_len);
}

/// Seconds since the Unix epoch.
fn native_clock(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 0)?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| e.to_string())?;
    Ok(Value::Number(now.as_secs_f64()))
}

/// Blocks the calling thread for the given number of milliseconds.
fn native_sleep(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    let ms = arg_number(args, 0)?;
    if ms.is_finite() && ms > 0.0 {
        thread::sleep(Duration::from_millis(ms as u64));
    }
    Ok(Value::Null)
}

fn native_len(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        _ => 0,
    };
    Ok(Value::Number(len as f64))
}

#[cfg(test)]
mod tests {
    use super::super::testing::call;
    use jihll_vm::Value;

    #[test]
    fn test_len() {
        assert_eq!(call("len", &[Value::from("héllo")]), Ok(Value::Number(5.0)));
        assert_eq!(
            call("len", &[Value::list(vec![Value::Null, Value::Null])]),
            Ok(Value::Number(2.0))
        );
        assert_eq!(call("len", &[Value::Number(9.0)]), Ok(Value::Number(0.0)));
        assert!(call("len", &[]).is_err());
    }

    #[test]
    fn test_clock_is_positive() {
        match call("clock", &[]) {
            Ok(Value::Number(n)) => assert!(n > 0.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sleep_rejects_strings() {
        assert_eq!(call("sleep", &[Value::Number(1.0)]), Ok(Value::Null));
        assert!(call("sleep", &[Value::from("1")]).is_err());
    }
}
