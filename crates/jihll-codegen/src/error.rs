//! Codegen errors.

use jihll_common::{Diagnostic, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    /// Left-hand side of `=` is not a variable or property.
    #[error("invalid assignment target")]
    InvalidAssignTarget(Span),
    #[error("spawn must wrap a call")]
    SpawnNonCall(Span),
    #[error("'this' used outside of a method")]
    ThisOutsideMethod(Span),
    /// An operand does not fit in one code word.
    #[error("operand {0} out of range")]
    OperandOverflow(usize),
}

impl CodegenError {
    pub fn span(&self) -> Option<Span> {
        match self {
            CodegenError::InvalidAssignTarget(s)
            | CodegenError::SpawnNonCall(s)
            | CodegenError::ThisOutsideMethod(s) => Some(*s),
            CodegenError::OperandOverflow(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self.span() {
            Some(span) => diag.with_span(span),
            None => diag,
        }
    }
}
