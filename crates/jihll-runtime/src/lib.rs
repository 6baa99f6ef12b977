//! Runtime for Jihll.
//!
//! Wires the front end, code generator and VM together: the native
//! capability table, a file-backed [`ModuleLoader`](jihll_vm::ModuleLoader)
//! for `import`, and [`RuntimeConfig`].

pub mod config;
pub mod error;
pub mod frontend;
pub mod loader;
pub mod natives;

pub use config::RuntimeConfig;
pub use error::{ErrorKind, RunError};
pub use frontend::{compile_file, compile_source};
pub use loader::FileLoader;

use std::sync::Arc;

use jihll_common::SourceFile;
use jihll_vm::{NativeRegistry, Output, StdOutput, Value, Vm};

/// Create a VM with all natives registered and file imports enabled.
pub fn create_vm(config: &RuntimeConfig) -> Vm {
    create_vm_with_output(config, Arc::new(StdOutput))
}

pub fn create_vm_with_output(config: &RuntimeConfig, output: Arc<dyn Output>) -> Vm {
    let mut registry = NativeRegistry::new();
    natives::register_all(&mut registry);
    let loader = FileLoader::new(config.import_root.clone(), config.search_paths.clone());
    let mut vm = Vm::new()
        .with_config(config.vm)
        .with_output(output)
        .with_loader(Arc::new(loader));
    vm.register_natives(&registry);
    vm
}

/// Compile and run one compile unit on an existing VM. Globals persist
/// across calls.
pub fn run_source(vm: &mut Vm, file: &SourceFile) -> Result<Value, RunError> {
    let chunk = compile_source(file)?;
    Ok(vm.interpret(chunk)?)
}

/// Run a main program, then wait for every thread it spawned, even when the
/// main program fails.
pub fn run_main(vm: &mut Vm, file: &SourceFile) -> Result<Value, RunError> {
    let result = run_source(vm, file);
    vm.join_spawned();
    result
}
