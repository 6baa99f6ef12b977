//! Bytecode chunks.

use std::fmt::Write;
use std::sync::Arc;

use crate::opcode::OpCode;

/// A function's compile-time description. The owning chunk is supplied when
/// the constant is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionProto {
    pub name: Arc<str>,
    pub arity: usize,
    pub entry: usize,
}

/// Constant pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    Function(FunctionProto),
}

impl Constant {
    pub fn as_str(&self) -> Option<&Arc<str>> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// An instruction stream plus its constant pool. Append-only while the
/// compiler owns it, then shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    pub name: String,
    pub code: Vec<i32>,
    pub constants: Vec<Constant>,
}

impl Chunk {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Append a word and return its index.
    pub fn write(&mut self, word: i32) -> usize {
        self.code.push(word);
        self.code.len() - 1
    }

    pub fn write_op(&mut self, op: OpCode) -> usize {
        self.write(op.encode())
    }

    /// Add a constant and return its index.
    pub fn add_constant(&mut self, c: Constant) -> usize {
        self.constants.push(c);
        self.constants.len() - 1
    }

    /// Overwrite a previously written word.
    pub fn patch(&mut self, at: usize, word: i32) {
        if let Some(slot) = self.code.get_mut(at) {
            *slot = word;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Human-readable listing, one instruction per line.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", self.name);
        let mut ip = 0;
        while ip < self.code.len() {
            let word = self.code[ip];
            let Some(op) = OpCode::decode(word) else {
                let _ = writeln!(out, "{:04}  <invalid {}>", ip, word);
                ip += 1;
                continue;
            };
            if op.operand_count() == 0 {
                let _ = writeln!(out, "{:04}  {}", ip, op.name());
                ip += 1;
                continue;
            }
            let operand = self.code.get(ip + 1).copied().unwrap_or(0);
            let _ = write!(out, "{:04}  {:<16}{:>5}", ip, op.name(), operand);
            if op.is_jump() {
                let target = ip as i64 + 2 + operand as i64;
                let _ = write!(out, " -> {:04}", target);
            } else if op.uses_constant() {
                match self.constants.get(operand as usize) {
                    Some(c) => {
                        let _ = write!(out, " {}", describe_constant(c));
                    }
                    None => {
                        let _ = write!(out, " <bad constant>");
                    }
                }
            }
            out.push('\n');
            ip += 2;
        }
        out
    }
}

fn describe_constant(c: &Constant) -> String {
    match c {
        Constant::Null => "null".to_string(),
        Constant::Bool(b) => b.to_string(),
        Constant::Number(n) => n.to_string(),
        Constant::Str(s) => format!("{:?}", s),
        Constant::Function(f) => format!("<fn {}/{} @{:04}>", f.name, f.arity, f.entry),
    }
}
