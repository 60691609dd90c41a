mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use colored::*;
use std::fs;
use std::io;
use std::process;
use svm::console::Console;
use svm::constants::EXIT_STOPPED;
use svm::debug::Debugger;
use svm::signals::SignalFlags;
use svm::{RunOutcome, Runner, Snapshot, VM};

fn load_machine(cli: &Cli) -> Result<VM> {
    if let Some(path) = &cli.restore {
        let snapshot = Snapshot::load(path)
            .with_context(|| format!("Error reading snapshot '{}'", path.display()))?;
        return VM::restore(snapshot)
            .with_context(|| format!("Error restoring snapshot '{}'", path.display()));
    }

    let binary = fs::read(&cli.image)
        .with_context(|| format!("Error reading file '{}'", cli.image.display()))?;
    let mut vm = VM::new();
    vm.load_image(&binary)
        .with_context(|| format!("Error loading binary '{}'", cli.image.display()))?;
    Ok(vm)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut vm = load_machine(&cli)?;
    vm.trace = cli.trace;

    if let Some(input) = cli.processed_input() {
        vm.push_input_str(&input);
        log::debug!("Pre-populated input buffer with: {:?}", input);
    }

    let signals = SignalFlags::install().context("Error installing signal handlers")?;
    let console = Console::stdin();

    let outcome = Runner::new(&mut vm, &console, &signals, &cli.save_dir, io::stdout()).run();

    if cli.verbose {
        Debugger::new().print_state(&vm);
    }

    match outcome {
        Ok(RunOutcome::Halted(reason)) => {
            log::debug!("Execution completed: {reason}");
        }
        Ok(RunOutcome::InputClosed) => {
            log::debug!("Execution ended at pc={} waiting for input", vm.pc);
        }
        Ok(RunOutcome::Stopped(path)) => {
            eprintln!("\n{} {}", "Saved state to".bright_green().bold(), path.display());
            process::exit(EXIT_STOPPED);
        }
        Err(e) => {
            eprintln!("\n{}: {e}", "Runtime error".bright_red().bold());
            process::exit(1);
        }
    }

    Ok(())
}
