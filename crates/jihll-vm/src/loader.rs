//! Module loading seam for `import`.

use crate::chunk::Chunk;

/// Turns an import path into a compiled chunk. Installed by the host; the VM
/// itself knows nothing about files or the compiler.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<Chunk, String>;
}

impl<F> ModuleLoader for F
where
    F: Fn(&str) -> Result<Chunk, String> + Send + Sync,
{
    fn load(&self, path: &str) -> Result<Chunk, String> {
        self(path)
    }
}
