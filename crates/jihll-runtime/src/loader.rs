//! File-backed module loader for `import`.

use std::path::PathBuf;

use jihll_vm::{Chunk, ModuleLoader};

use crate::config;
use crate::frontend;

/// Resolves import paths against a root directory and search paths, then
/// parses and compiles the first file that exists.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
    search_paths: Vec<PathBuf>,
}

impl FileLoader {
    pub fn new(root: PathBuf, search_paths: Vec<PathBuf>) -> Self {
        Self { root, search_paths }
    }

    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        config::candidates(&self.root, &self.search_paths, path)
            .into_iter()
            .find(|candidate| candidate.is_file())
    }
}

impl ModuleLoader for FileLoader {
    fn load(&self, path: &str) -> Result<Chunk, String> {
        let resolved = self
            .resolve(path)
            .ok_or_else(|| format!("module not found: {}", path))?;
        tracing::debug!(import = path, file = %resolved.display(), "resolved module");
        frontend::compile_file(&resolved).map_err(|err| err.to_string())
    }
}
