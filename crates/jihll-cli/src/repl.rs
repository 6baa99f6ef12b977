//! Interactive prompt.

use std::process::ExitCode;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use jihll_common::SourceFile;
use jihll_runtime::{create_vm, run_source, RunError, RuntimeConfig};

const PROMPT: &str = "> ";
const CONTINUE_PROMPT: &str = ".. ";

/// Read lines until end of input. Globals persist between entries and
/// failures are reported without leaving the loop.
pub fn run(config: &RuntimeConfig) -> anyhow::Result<ExitCode> {
    let mut rl = DefaultEditor::new().context("cannot initialize line editor")?;
    let mut vm = create_vm(config);
    println!("Jihll v{} (stack VM)", env!("CARGO_PKG_VERSION"));

    let mut entry = 0usize;
    while let Some(source) = read_entry(&mut rl)? {
        if source.trim().is_empty() {
            continue;
        }
        entry += 1;
        let file = SourceFile::new(format!("<repl:{}>", entry), source);
        if let Err(err) = run_source(&mut vm, &file) {
            report(&err);
        }
    }
    vm.join_spawned();
    Ok(ExitCode::SUCCESS)
}

/// Read one entry, continuing onto further lines while the input is an
/// unfinished block. A blank continuation line submits what was typed.
fn read_entry(rl: &mut DefaultEditor) -> anyhow::Result<Option<String>> {
    let mut buffer = match readline(rl, PROMPT)? {
        Some(line) => line,
        None => return Ok(None),
    };
    while is_incomplete(&buffer) {
        match readline(rl, CONTINUE_PROMPT)? {
            Some(line) if !line.trim().is_empty() => {
                buffer.push('\n');
                buffer.push_str(&line);
            }
            _ => break,
        }
    }
    if let Err(err) = rl.add_history_entry(buffer.as_str()) {
        tracing::debug!(target: "jihll::repl", error = %err, "history entry dropped");
    }
    Ok(Some(buffer))
}

fn readline(rl: &mut DefaultEditor, prompt: &str) -> anyhow::Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err).context("cannot read input"),
    }
}

/// An open block or call that ran into the end of input.
fn is_incomplete(source: &str) -> bool {
    matches!(jihll_syntax::parse(source), Err(err) if err.message.ends_with("found end of file"))
}

fn report(err: &RunError) {
    match err {
        RunError::Compile { diagnostic, file, .. } => {
            eprint!("{}", diagnostic.render_plain(file));
        }
        _ => eprintln!("{}", err),
    }
}
