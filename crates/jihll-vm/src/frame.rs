//! Call frames and the exception handler slot.

use std::fmt;
use std::sync::Arc;

use crate::chunk::Chunk;
use crate::value::Value;

/// The armed catch target. Records where the `try` began so that a failure in
/// a callee can unwind back to it.
#[derive(Clone)]
pub struct Handler {
    pub address: usize,
    pub chunk: Arc<Chunk>,
    pub fp: usize,
    pub frame_depth: usize,
    pub stack_len: usize,
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("address", &self.address)
            .field("chunk", &self.chunk.name)
            .field("fp", &self.fp)
            .field("frame_depth", &self.frame_depth)
            .field("stack_len", &self.stack_len)
            .finish()
    }
}

/// Caller state saved by CALL and restored by RETURN.
#[derive(Clone)]
pub struct CallFrame {
    pub chunk: Arc<Chunk>,
    pub ip: usize,
    pub fp: usize,
    pub handler: Option<Handler>,
    /// Replaces the callee's return value; set for `init`.
    pub return_override: Option<Value>,
}

impl fmt::Debug for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallFrame")
            .field("chunk", &self.chunk.name)
            .field("ip", &self.ip)
            .field("fp", &self.fp)
            .field("handler", &self.handler)
            .field("return_override", &self.return_override)
            .finish()
    }
}
