//! Jihll command-line interface.
//!
//! - `jihll` - interactive prompt
//! - `jihll <file>` - run a script
//! - `jihll --dump <file>` - print the compiled bytecode instead of running it

mod repl;

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jihll_runtime::{create_vm, frontend, run_main, RuntimeConfig};

#[derive(Parser)]
#[command(name = "jihll")]
#[command(about = "Jihll stack VM", version, long_about = None)]
struct Cli {
    /// Script to run. Starts the interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the disassembled chunk and exit
    #[arg(long, requires = "file")]
    dump: bool,

    /// Operand stack limit, in slots
    #[arg(long, value_name = "N")]
    stack_limit: Option<usize>,

    /// Directory relative imports resolve against (default: the script's directory)
    #[arg(long, value_name = "DIR")]
    import_root: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let project_dir = match (&cli.import_root, &cli.file) {
        (Some(root), _) => root.clone(),
        (None, Some(file)) => script_dir(file),
        (None, None) => env::current_dir().context("cannot determine current directory")?,
    };
    let mut config = RuntimeConfig::from_env(project_dir);
    if let Some(limit) = cli.stack_limit {
        config.vm.stack_limit = limit;
    }
    tracing::debug!(root = %config.import_root.display(), "runtime configured");

    match &cli.file {
        Some(file) if cli.dump => Ok(dump(file)),
        Some(file) => Ok(run_file(file, &config)),
        None => repl::run(&config),
    }
}

fn script_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn dump(file: &Path) -> ExitCode {
    match frontend::compile_file(file) {
        Ok(chunk) => {
            print!("{}", chunk.disassemble());
            ExitCode::SUCCESS
        }
        Err(err) => {
            err.emit();
            ExitCode::FAILURE
        }
    }
}

fn run_file(file: &Path, config: &RuntimeConfig) -> ExitCode {
    let mut vm = create_vm(config);
    let result = frontend::read_source(file).and_then(|source| run_main(&mut vm, &source));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            err.emit();
            ExitCode::FAILURE
        }
    }
}
