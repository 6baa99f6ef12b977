//! Native function interface.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::output::Output;
use crate::value::Value;

/// Signature of a native function. Failures become catchable runtime errors.
pub type NativeFn = fn(&NativeCtx, &[Value]) -> Result<Value, String>;

/// A named native callable, stored in the global table like any value.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}>", self.name)
    }
}

/// What a native can reach of the calling VM.
pub struct NativeCtx {
    output: Arc<dyn Output>,
}

impl NativeCtx {
    pub fn new(output: Arc<dyn Output>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &dyn Output {
        &*self.output
    }
}

/// Registry of native functions, kept in registration order.
#[derive(Debug, Default, Clone)]
pub struct NativeRegistry {
    natives: IndexMap<&'static str, NativeFunction>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native; a later registration under the same name wins.
    pub fn register(&mut self, name: &'static str, func: NativeFn) {
        self.natives.insert(name, NativeFunction { name, func });
    }

    pub fn get(&self, name: &str) -> Option<&NativeFunction> {
        self.natives.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NativeFunction> {
        self.natives.values()
    }

    pub fn len(&self) -> usize {
        self.natives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.natives.is_empty()
    }
}
