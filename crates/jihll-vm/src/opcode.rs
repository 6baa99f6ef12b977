//! Opcodes.
//!
//! Every instruction is one opcode word followed by zero or one operand words.

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum OpCode {
    Return = 0,
    /// `k`: push constant `k`.
    Constant,

    // === Arithmetic ===
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,
    Not,

    Print,
    Pop,

    // === Variables ===
    GetGlobal,
    SetGlobal,
    GetLocal,
    SetLocal,

    // === Control flow: operand is a signed offset from the next instruction ===
    JumpIfFalse,
    Jump,

    /// `n`: call the value below `n` arguments.
    Call,
    /// `n`: like `Call`, on a new thread, pushing null.
    Spawn,

    // === Comparison ===
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,

    // === Aggregates ===
    BuildList,
    BuildMap,

    Import,

    // === Classes ===
    Class,
    Method,
    GetProperty,
    SetProperty,

    // === Exceptions ===
    TryEnter,
    TryExit,
}

impl OpCode {
    /// Decode an opcode word.
    pub fn decode(word: i32) -> Option<OpCode> {
        let byte = u8::try_from(word).ok()?;
        OpCode::try_from(byte).ok()
    }

    #[inline]
    pub fn encode(self) -> i32 {
        u8::from(self) as i32
    }

    /// Number of operand words following the opcode.
    pub fn operand_count(self) -> usize {
        use OpCode::*;
        match self {
            Constant | GetGlobal | SetGlobal | GetLocal | SetLocal | JumpIfFalse | Jump | Call
            | Spawn | BuildList | BuildMap | Class | Method | GetProperty | SetProperty
            | TryEnter => 1,
            _ => 0,
        }
    }

    /// Whether the operand is a relative jump offset.
    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Jump | OpCode::JumpIfFalse | OpCode::TryEnter)
    }

    /// Whether the operand indexes the constant pool.
    pub fn uses_constant(self) -> bool {
        use OpCode::*;
        matches!(
            self,
            Constant | GetGlobal | SetGlobal | Class | Method | GetProperty | SetProperty
        )
    }

    pub fn name(self) -> &'static str {
        use OpCode::*;
        match self {
            Return => "RETURN",
            Constant => "CONSTANT",
            Add => "ADD",
            Subtract => "SUBTRACT",
            Multiply => "MULTIPLY",
            Divide => "DIVIDE",
            Negate => "NEGATE",
            Not => "NOT",
            Print => "PRINT",
            Pop => "POP",
            GetGlobal => "GET_GLOBAL",
            SetGlobal => "SET_GLOBAL",
            GetLocal => "GET_LOCAL",
            SetLocal => "SET_LOCAL",
            JumpIfFalse => "JUMP_IF_FALSE",
            Jump => "JUMP",
            Call => "CALL",
            Spawn => "SPAWN",
            Less => "LESS",
            Greater => "GREATER",
            LessEqual => "LESS_EQUAL",
            GreaterEqual => "GREATER_EQUAL",
            Equal => "EQUAL",
            NotEqual => "NOT_EQUAL",
            BuildList => "BUILD_LIST",
            BuildMap => "BUILD_MAP",
            Import => "IMPORT",
            Class => "CLASS",
            Method => "METHOD",
            GetProperty => "GET_PROPERTY",
            SetProperty => "SET_PROPERTY",
            TryEnter => "TRY_ENTER",
            TryExit => "TRY_EXIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_roundtrip_for_every_opcode() {
        let mut word = 0;
        while let Some(op) = OpCode::decode(word) {
            assert_eq!(op.encode(), word);
            word += 1;
        }
        assert_eq!(OpCode::decode(word - 1), Some(OpCode::TryExit));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(OpCode::decode(-1), None);
        assert_eq!(OpCode::decode(255), None);
        assert_eq!(OpCode::decode(1 << 20), None);
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(OpCode::Return.operand_count(), 0);
        assert_eq!(OpCode::TryExit.operand_count(), 0);
        assert_eq!(OpCode::TryEnter.operand_count(), 1);
        assert_eq!(OpCode::Import.operand_count(), 0);
        assert!(OpCode::JumpIfFalse.is_jump());
        assert!(!OpCode::Call.is_jump());
    }
}
