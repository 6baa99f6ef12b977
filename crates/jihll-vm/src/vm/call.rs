//! CALL and RETURN.

use std::sync::Arc;

use super::Vm;
use crate::error::{VmError, VmResult};
use crate::frame::CallFrame;
use crate::natives::{NativeCtx, NativeFunction};
use crate::value::{Function, Instance, Value};

impl Vm {
    /// Call the value sitting below the top `argc` stack slots.
    pub(super) fn call_value(&mut self, argc: usize) -> VmResult<()> {
        let callee_slot = self
            .stack
            .len()
            .checked_sub(argc + 1)
            .ok_or(VmError::StackUnderflow)?;

        match self.stack[callee_slot].clone() {
            Value::Function(func) => {
                check_arity(&func, argc)?;
                self.enter_function(func, callee_slot, None)
            }
            Value::BoundMethod(bound) => {
                check_arity(&bound.method, argc)?;
                self.bind_receiver(callee_slot, &bound.method, bound.receiver.clone())?;
                self.enter_function(bound.method.clone(), callee_slot, None)
            }
            Value::Native(native) => self.call_native(native, callee_slot),
            Value::Class(class) => {
                let instance = Arc::new(Instance::new(class.clone()));
                match class.find_method("init") {
                    None => {
                        // Without an initializer, arguments are ignored.
                        self.stack.truncate(callee_slot);
                        self.push(Value::Instance(instance))
                    }
                    Some(init) => {
                        check_arity(&init, argc)?;
                        self.bind_receiver(callee_slot, &init, instance.clone())?;
                        self.enter_function(init, callee_slot, Some(Value::Instance(instance)))
                    }
                }
            }
            other => Err(VmError::NotCallable(other.type_name())),
        }
    }

    /// Replace the callee with `method` and insert the receiver above it, so
    /// that it lands in local slot 0.
    fn bind_receiver(
        &mut self,
        callee_slot: usize,
        method: &Arc<Function>,
        receiver: Arc<Instance>,
    ) -> VmResult<()> {
        if self.stack.len() >= self.config.stack_limit {
            return Err(VmError::StackOverflow);
        }
        self.stack[callee_slot] = Value::Function(method.clone());
        self.stack.insert(callee_slot + 1, Value::Instance(receiver));
        Ok(())
    }

    fn enter_function(
        &mut self,
        func: Arc<Function>,
        callee_slot: usize,
        return_override: Option<Value>,
    ) -> VmResult<()> {
        if self.frames.len() >= self.config.frame_limit {
            return Err(VmError::StackOverflow);
        }
        let caller_chunk = std::mem::replace(&mut self.chunk, func.chunk.clone());
        self.frames.push(CallFrame {
            chunk: caller_chunk,
            ip: self.ip,
            fp: self.fp,
            handler: self.handler.clone(),
            return_override,
        });
        self.fp = callee_slot + 1;
        self.ip = func.entry;
        Ok(())
    }

    fn call_native(&mut self, native: NativeFunction, callee_slot: usize) -> VmResult<()> {
        let args = self.stack.split_off(callee_slot + 1);
        self.stack.truncate(callee_slot);
        let ctx = NativeCtx::new(self.output.clone());
        let result = (native.func)(&ctx, &args).map_err(|message| VmError::Native {
            name: native.name.to_string(),
            message,
        })?;
        self.push(result)
    }

    /// Pop the current frame, or finish the run when at `base_depth`.
    pub(super) fn do_return(&mut self, value: Value, base_depth: usize) -> VmResult<Option<Value>> {
        if self.frames.len() <= base_depth {
            return Ok(Some(value));
        }
        let Some(frame) = self.frames.pop() else {
            return Ok(Some(value));
        };
        let value = frame.return_override.unwrap_or(value);
        self.stack.truncate(self.fp.saturating_sub(1));
        self.chunk = frame.chunk;
        self.ip = frame.ip;
        self.fp = frame.fp;
        self.handler = frame.handler;
        self.push(value)?;
        Ok(None)
    }
}

pub(super) fn check_arity(func: &Function, argc: usize) -> VmResult<()> {
    if func.arity != argc {
        return Err(VmError::ArityMismatch {
            name: func.name.to_string(),
            expected: func.arity,
            got: argc,
        });
    }
    Ok(())
}
