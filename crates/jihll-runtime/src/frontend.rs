//! Source text to chunk.

use std::fs;
use std::path::Path;

use jihll_common::SourceFile;
use jihll_vm::Chunk;

use crate::error::{ErrorKind, RunError};

pub fn compile_source(file: &SourceFile) -> Result<Chunk, RunError> {
    let program = jihll_syntax::parse(file.source())
        .map_err(|err| RunError::compile(ErrorKind::Parse, file, err.to_diagnostic()))?;
    jihll_codegen::compile_named(&program, file.name())
        .map_err(|err| RunError::compile(ErrorKind::Codegen, file, err.to_diagnostic()))
}

pub fn read_source(path: &Path) -> Result<SourceFile, RunError> {
    let text = fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceFile::new(path.display().to_string(), text))
}

pub fn compile_file(path: &Path) -> Result<Chunk, RunError> {
    compile_source(&read_source(path)?)
}
