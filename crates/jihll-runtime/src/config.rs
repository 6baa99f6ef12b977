//! Runtime configuration.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use jihll_vm::VmConfig;

/// Extra import directories, in `PATH` syntax.
pub const PATH_VAR: &str = "JIHLL_PATH";
/// Operand stack limit override.
pub const STACK_LIMIT_VAR: &str = "JIHLL_STACK_LIMIT";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Relative imports resolve here first.
    pub import_root: PathBuf,
    /// Searched in order after `import_root`.
    pub search_paths: Vec<PathBuf>,
    pub vm: VmConfig,
}

impl RuntimeConfig {
    pub fn new(import_root: PathBuf) -> Self {
        Self {
            import_root,
            search_paths: Vec::new(),
            vm: VmConfig::default(),
        }
    }

    /// Create a config using environment variables and the user library
    /// directory `~/.jihll/lib`.
    pub fn from_env(project_dir: PathBuf) -> Self {
        Self::from_vars(
            project_dir,
            env::var_os(PATH_VAR),
            env::var(STACK_LIMIT_VAR).ok(),
            dirs::home_dir(),
        )
    }

    fn from_vars(
        project_dir: PathBuf,
        jihll_path: Option<OsString>,
        stack_limit: Option<String>,
        home: Option<PathBuf>,
    ) -> Self {
        let mut config = Self::new(project_dir);
        if let Some(paths) = jihll_path {
            config
                .search_paths
                .extend(env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }
        if let Some(lib) = home.map(|h| h.join(".jihll").join("lib")) {
            config.search_paths.push(lib);
        }
        match stack_limit.as_deref().map(str::parse::<usize>) {
            Some(Ok(limit)) if limit > 0 => config.vm.stack_limit = limit,
            Some(_) => tracing::warn!(
                value = stack_limit.as_deref().unwrap_or_default(),
                "ignoring invalid {}",
                STACK_LIMIT_VAR
            ),
            None => {}
        }
        config
    }

    /// Candidate files for an import path, in lookup order.
    pub fn candidates(&self, path: &str) -> Vec<PathBuf> {
        candidates(&self.import_root, &self.search_paths, path)
    }
}

pub(crate) fn candidates(root: &Path, search_paths: &[PathBuf], path: &str) -> Vec<PathBuf> {
    let path = Path::new(path);
    if path.is_absolute() {
        return vec![path.to_path_buf()];
    }
    std::iter::once(root)
        .chain(search_paths.iter().map(PathBuf::as_path))
        .map(|dir| dir.join(path))
        .collect()
}
