//! Runtime failures.
//!
//! Every failure is catchable: when a handler is armed the loop turns the
//! error's `Display` text into the caught string value.

use thiserror::Error;

pub type VmResult<T> = Result<T, VmError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VmError {
    #[error("{0}")]
    Type(String),
    #[error("undefined variable '{0}'")]
    UndefinedGlobal(String),
    #[error("undefined property '{name}' on {class} instance")]
    UndefinedProperty { name: String, class: String },
    #[error("only instances have properties, got {0}")]
    NotAnInstance(&'static str),
    #[error("can only call functions and classes, got {0}")]
    NotCallable(&'static str),
    #[error("{name} expects {expected} argument(s) but got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("invalid local slot {0}")]
    InvalidLocal(usize),
    #[error("invalid opcode {word} at {at}")]
    InvalidOpcode { word: i32, at: usize },
    #[error("missing operand at {0}")]
    MissingOperand(usize),
    #[error("jump out of range at {0}")]
    InvalidJump(usize),
    #[error("invalid constant {0}")]
    InvalidConstant(usize),
    #[error("unhashable map key of type {0}")]
    UnhashableKey(&'static str),
    #[error("{name}: {message}")]
    Native { name: String, message: String },
    #[error("import '{path}' failed: {message}")]
    Import { path: String, message: String },
    #[error("spawn failed: {0}")]
    Spawn(String),
}

impl VmError {
    pub fn type_error(message: impl Into<String>) -> Self {
        VmError::Type(message.into())
    }
}
