//! The virtual machine.

mod call;
mod dispatch;
mod import;
mod spawn;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::thread::JoinHandle;

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::chunk::Chunk;
use crate::error::{VmError, VmResult};
use crate::frame::{CallFrame, Handler};
use crate::loader::ModuleLoader;
use crate::natives::{NativeFn, NativeFunction, NativeRegistry};
use crate::output::{Output, StdOutput};
use crate::value::Value;

/// Resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum operand stack slots.
    pub stack_limit: usize,
    /// Maximum call depth.
    pub frame_limit: usize,
    /// Maximum nesting of in-progress imports.
    pub import_limit: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_limit: 16384,
            frame_limit: 1024,
            import_limit: 64,
        }
    }
}

/// Handles of spawned threads, shared by a VM and everything it spawns.
#[derive(Default)]
struct SpawnSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
    counter: AtomicUsize,
}

/// Executes chunks. One VM per thread of execution.
pub struct Vm {
    stack: Vec<Value>,
    globals: HashMap<Arc<str>, Value>,
    frames: Vec<CallFrame>,
    chunk: Arc<Chunk>,
    ip: usize,
    /// Base slot of the running function's locals.
    fp: usize,
    handler: Option<Handler>,
    /// Imports currently running on this VM.
    imports: usize,
    config: VmConfig,
    output: Arc<dyn Output>,
    loader: Option<Arc<dyn ModuleLoader>>,
    spawned: Arc<SpawnSet>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            globals: HashMap::new(),
            frames: Vec::new(),
            chunk: Arc::new(Chunk::new("<empty>")),
            ip: 0,
            fp: 0,
            handler: None,
            imports: 0,
            config: VmConfig::default(),
            output: Arc::new(StdOutput),
            loader: None,
            spawned: Arc::new(SpawnSet::default()),
        }
    }

    pub fn with_config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_output(mut self, output: Arc<dyn Output>) -> Self {
        self.output = output;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn output(&self) -> &Arc<dyn Output> {
        &self.output
    }

    /// Bind a native under `name` in the global table.
    pub fn define_native(&mut self, name: &'static str, func: NativeFn) {
        self.globals
            .insert(Arc::from(name), Value::Native(NativeFunction { name, func }));
    }

    pub fn register_natives(&mut self, registry: &NativeRegistry) {
        for native in registry.iter() {
            self.globals.insert(Arc::from(native.name), Value::Native(*native));
        }
    }

    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name).cloned()
    }

    pub fn set_global(&mut self, name: &str, value: Value) {
        self.globals.insert(Arc::from(name), value);
    }

    /// Current operand stack height.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Run a top-level chunk. Globals persist across calls; the stack, frames
    /// and handler start fresh.
    pub fn interpret(&mut self, chunk: Chunk) -> VmResult<Value> {
        self.stack.clear();
        self.frames.clear();
        self.handler = None;
        self.chunk = Arc::new(chunk);
        self.ip = 0;
        self.fp = 0;
        let result = self.execute(0);
        if result.is_err() {
            self.stack.clear();
            self.frames.clear();
            self.handler = None;
        }
        result
    }

    /// Wait for every thread spawned from this VM, including threads those
    /// threads spawned.
    pub fn join_spawned(&self) {
        loop {
            let handles = std::mem::take(&mut *self.spawned.handles.lock());
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                let name = handle.thread().name().map(str::to_string);
                if handle.join().is_err() {
                    tracing::error!(target: "jihll::vm", thread = ?name, "spawned thread panicked");
                }
            }
        }
    }

    /// Run until RETURN executes with `base_depth` frames on the stack.
    fn execute(&mut self, base_depth: usize) -> VmResult<Value> {
        loop {
            match self.step(base_depth) {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(err) => self.recover(err)?,
            }
        }
    }

    /// Route a failure to the armed handler, or hand it back.
    fn recover(&mut self, err: VmError) -> VmResult<()> {
        let Some(handler) = self.handler.take() else {
            return Err(err);
        };
        tracing::debug!(
            target: "jihll::vm",
            error = %err,
            address = handler.address,
            unwound = self.frames.len().saturating_sub(handler.frame_depth),
            "caught runtime error"
        );
        self.frames.truncate(handler.frame_depth);
        self.stack.truncate(handler.stack_len);
        self.chunk = handler.chunk;
        self.fp = handler.fp;
        self.ip = handler.address;
        self.stack.push(Value::str(err.to_string()));
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Stack helpers
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    fn push(&mut self, value: Value) -> VmResult<()> {
        if self.stack.len() >= self.config.stack_limit {
            return Err(VmError::StackOverflow);
        }
        self.stack.push(value);
        Ok(())
    }

    #[inline]
    fn pop(&mut self) -> VmResult<Value> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }

    #[inline]
    fn peek(&self, distance: usize) -> VmResult<&Value> {
        self.stack
            .len()
            .checked_sub(distance + 1)
            .and_then(|i| self.stack.get(i))
            .ok_or(VmError::StackUnderflow)
    }

    /// Remove the top `n` values, in stack order.
    fn pop_n(&mut self, n: usize) -> VmResult<Vec<Value>> {
        let at = self
            .stack
            .len()
            .checked_sub(n)
            .ok_or(VmError::StackUnderflow)?;
        Ok(self.stack.split_off(at))
    }
}

#[cfg(test)]
mod tests;
