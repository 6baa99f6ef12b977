//! IMPORT: run another compile unit against this VM's globals.

use std::sync::Arc;

use super::Vm;
use crate::error::{VmError, VmResult};

impl Vm {
    /// Load `path` and run its top level to completion, then resume the
    /// importer where it left off.
    pub(super) fn import(&mut self, path: String) -> VmResult<()> {
        let Some(loader) = self.loader.clone() else {
            return Err(VmError::Import {
                path,
                message: "no module loader installed".to_string(),
            });
        };
        if self.imports >= self.config.import_limit {
            return Err(VmError::Import {
                path,
                message: "imports nested too deeply".to_string(),
            });
        }
        let chunk = loader.load(&path).map_err(|message| VmError::Import {
            path: path.clone(),
            message,
        })?;
        tracing::debug!(target: "jihll::vm", path = %path, words = chunk.len(), "importing module");

        let depth = self.frames.len();
        let height = self.stack.len();
        let saved_chunk = std::mem::replace(&mut self.chunk, Arc::new(chunk));
        let saved_ip = std::mem::replace(&mut self.ip, 0);
        let saved_fp = std::mem::replace(&mut self.fp, height);
        let saved_handler = self.handler.take();

        self.imports += 1;
        let result = self.execute(depth);
        self.imports -= 1;

        self.frames.truncate(depth);
        self.stack.truncate(height);
        self.chunk = saved_chunk;
        self.ip = saved_ip;
        self.fp = saved_fp;
        self.handler = saved_handler;

        result.map(drop).map_err(|err| VmError::Import {
            path,
            message: err.to_string(),
        })
    }
}
