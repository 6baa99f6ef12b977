//! Bytecode virtual machine for Jihll.
//!
//! A [`Chunk`] holds a flat `i32` word stream plus its constant pool. The
//! [`Vm`] executes one chunk at a time against an operand stack, a global
//! table and a call-frame stack. Native functions are registered through a
//! [`NativeRegistry`]; `import` reaches the front end through a
//! [`ModuleLoader`] supplied by the host.

pub mod chunk;
pub mod error;
pub mod frame;
pub mod loader;
pub mod natives;
pub mod opcode;
pub mod output;
pub mod value;
pub mod vm;

pub use chunk::{Chunk, Constant, FunctionProto};
pub use error::{VmError, VmResult};
pub use loader::ModuleLoader;
pub use natives::{NativeCtx, NativeFn, NativeFunction, NativeRegistry};
pub use opcode::OpCode;
pub use output::{CaptureOutput, Output, StdOutput};
pub use value::{BoundMethod, Class, Function, Instance, MapKey, Value};
pub use vm::{Vm, VmConfig};
