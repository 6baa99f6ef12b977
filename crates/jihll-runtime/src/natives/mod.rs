//! Native capability table.
//!
//! Every native has the signature `fn(&NativeCtx, &[Value]) -> Result<Value, String>`.
//! An `Err` becomes a catchable runtime failure in the calling VM.

pub mod builtin;
pub mod fs;
pub mod http;
pub mod json;
pub mod strings;

use jihll_vm::{NativeRegistry, Value};

/// Register all native functions.
pub fn register_all(registry: &mut NativeRegistry) {
    builtin::register(registry);
    strings::register(registry);
    json::register(registry);
    fs::register(registry);
    http::register(registry);
}

// ═══════════════════════════════════════════════════════════════════════════
// Argument helpers
// ═══════════════════════════════════════════════════════════════════════════

pub(crate) fn expect_args(args: &[Value], n: usize) -> Result<(), String> {
    if args.len() == n {
        Ok(())
    } else {
        Err(format!("expected {} argument(s), got {}", n, args.len()))
    }
}

pub(crate) fn arg_str(args: &[Value], i: usize) -> Result<&str, String> {
    match args.get(i) {
        Some(Value::Str(s)) => Ok(&**s),
        Some(other) => Err(format!(
            "argument {} must be a string, got {}",
            i + 1,
            other.type_name()
        )),
        None => Err(format!("missing argument {}", i + 1)),
    }
}

pub(crate) fn arg_number(args: &[Value], i: usize) -> Result<f64, String> {
    match args.get(i) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(format!(
            "argument {} must be a number, got {}",
            i + 1,
            other.type_name()
        )),
        None => Err(format!("missing argument {}", i + 1)),
    }
}

/// Textual form of any argument, for natives that accept paths or URLs.
pub(crate) fn arg_text(args: &[Value], i: usize) -> Result<String, String> {
    args.get(i)
        .map(Value::to_string)
        .ok_or_else(|| format!("missing argument {}", i + 1))
}
