//! HTTP natives.

use jihll_vm::{NativeCtx, NativeRegistry, Value};

use super::{arg_text, expect_args};

pub fn register(registry: &mut NativeRegistry) {
    registry.register("httpGet", native_http_get);
}

/// Response body as a string, or `null` when the request fails for any
/// reason (including non-2xx status).
fn native_http_get(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    let url = arg_text(args, 0)?;
    match fetch(&url) {
        Ok(body) => Ok(Value::from(body)),
        Err(err) => {
            tracing::debug!(url = %url, error = %err, "httpGet failed");
            Ok(Value::Null)
        }
    }
}

fn fetch(url: &str) -> Result<String, ureq::Error> {
    let mut response = ureq::get(url).call()?;
    response.body_mut().read_to_string()
}
