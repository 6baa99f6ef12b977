//! SPAWN: run a call on a new thread with a snapshot of the globals.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::call::check_arity;
use super::Vm;
use crate::error::{VmError, VmResult};
use crate::natives::{NativeCtx, NativeFunction};
use crate::value::{Function, Value};

/// Work handed to a spawned thread.
enum SpawnTask {
    Native(NativeFunction, Vec<Value>),
    /// `slots` become the function's locals, receiver first for methods.
    Script { func: Arc<Function>, slots: Vec<Value> },
}

impl Vm {
    pub(super) fn spawn(&mut self, argc: usize) -> VmResult<()> {
        let args = self.pop_n(argc)?;
        let task = match self.pop()? {
            Value::Native(native) => SpawnTask::Native(native, args),
            Value::Function(func) => {
                check_arity(&func, argc)?;
                SpawnTask::Script { func, slots: args }
            }
            Value::BoundMethod(bound) => {
                check_arity(&bound.method, argc)?;
                let mut slots = Vec::with_capacity(argc + 1);
                slots.push(Value::Instance(bound.receiver.clone()));
                slots.extend(args);
                SpawnTask::Script {
                    func: bound.method.clone(),
                    slots,
                }
            }
            other => {
                return Err(VmError::Spawn(format!(
                    "cannot spawn a {}",
                    other.type_name()
                )))
            }
        };

        let mut child = Vm {
            globals: self.globals.clone(),
            config: self.config,
            output: self.output.clone(),
            loader: self.loader.clone(),
            spawned: self.spawned.clone(),
            ..Vm::new()
        };
        let id = self.spawned.counter.fetch_add(1, Ordering::Relaxed);
        let name = format!("jihll-spawn-{}", id);
        tracing::debug!(target: "jihll::vm", thread = %name, "spawning");

        let thread_name = name.clone();
        let handle = std::thread::Builder::new()
            .name(name)
            .spawn(move || {
                if let Err(err) = child.run_task(task) {
                    tracing::warn!(target: "jihll::vm", thread = %thread_name, error = %err, "spawned thread failed");
                    child
                        .output
                        .report(&format!("[{}] runtime error: {}", thread_name, err));
                }
            })
            .map_err(|e| VmError::Spawn(e.to_string()))?;
        self.spawned.handles.lock().push(handle);

        self.push(Value::Null)
    }

    fn run_task(&mut self, task: SpawnTask) -> VmResult<Value> {
        match task {
            SpawnTask::Native(native, args) => {
                let ctx = NativeCtx::new(self.output.clone());
                (native.func)(&ctx, &args).map_err(|message| VmError::Native {
                    name: native.name.to_string(),
                    message,
                })
            }
            SpawnTask::Script { func, slots } => {
                self.stack = slots;
                self.chunk = func.chunk.clone();
                self.ip = func.entry;
                self.fp = 0;
                self.execute(0)
            }
        }
    }
}
