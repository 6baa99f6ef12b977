//! File natives. Paths are the textual form of the argument.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use jihll_vm::{NativeCtx, NativeRegistry, Value};

use super::{arg_text, expect_args};

pub fn register(registry: &mut NativeRegistry) {
    registry.register("readFile", native_read_file);
    registry.register("writeFile", native_write_file);
    registry.register("appendFile", native_append_file);
}

fn native_read_file(_ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1)?;
    let path = arg_text(args, 0)?;
    fs::read_to_string(&path)
        .map(Value::from)
        .map_err(|e| format!("unable to read file {}: {}", path, e))
}

/// Returns `false` instead of failing on I/O errors. The cause goes to the
/// report channel.
fn native_write_file(ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 2)?;
    let path = arg_text(args, 0)?;
    let text = arg_text(args, 1)?;
    Ok(written(ctx, "writeFile", &path, fs::write(&path, text)))
}

fn native_append_file(ctx: &NativeCtx, args: &[Value]) -> Result<Value, String> {
    expect_args(args, 2)?;
    let path = arg_text(args, 0)?;
    let text = arg_text(args, 1)?;
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| file.write_all(text.as_bytes()));
    Ok(written(ctx, "appendFile", &path, result))
}

fn written(ctx: &NativeCtx, name: &str, path: &str, result: io::Result<()>) -> Value {
    match result {
        Ok(()) => Value::Bool(true),
        Err(e) => {
            ctx.output()
                .report(&format!("{}: unable to write {}: {}", name, path, e));
            Value::Bool(false)
        }
    }
}
