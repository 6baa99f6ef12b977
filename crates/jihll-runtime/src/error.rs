//! Errors surfaced to drivers.

use std::io;
use std::path::PathBuf;

use jihll_common::{Diagnostic, SourceFile};
use jihll_vm::VmError;
use thiserror::Error;

/// Which stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Codegen,
    Runtime,
    Io,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Codegen => "codegen",
            ErrorKind::Runtime => "runtime",
            ErrorKind::Io => "io",
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    /// Parse or codegen failure; `summary` is the `file:line:col: message` form.
    #[error("{summary}")]
    Compile {
        kind: ErrorKind,
        file: SourceFile,
        diagnostic: Diagnostic,
        summary: String,
    },
    #[error("runtime error: {0}")]
    Runtime(#[from] VmError),
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    pub fn compile(kind: ErrorKind, file: &SourceFile, diagnostic: Diagnostic) -> Self {
        RunError::Compile {
            kind,
            summary: diagnostic.short(file),
            file: file.clone(),
            diagnostic,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::Compile { kind, .. } => *kind,
            RunError::Runtime(_) => ErrorKind::Runtime,
            RunError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Message without location or stage prefix.
    pub fn message(&self) -> String {
        match self {
            RunError::Compile { diagnostic, .. } => diagnostic.message.clone(),
            RunError::Runtime(err) => err.to_string(),
            RunError::Io { .. } => self.to_string(),
        }
    }

    /// Print rich diagnostics to stderr where a span is available.
    pub fn emit(&self) {
        match self {
            RunError::Compile {
                file, diagnostic, ..
            } if diagnostic.span.is_some() => {
                if diagnostic.emit(file).is_err() {
                    eprintln!("{}", self);
                }
            }
            _ => eprintln!("{}", self),
        }
    }
}
