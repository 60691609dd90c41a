//! Drives a machine against a console: runs it in batches, flushes output,
//! feeds it input lines and answers snapshot/stop requests.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::console::{Console, InputEvent};
use crate::constants::{INPUT_POLL_INTERVAL_MS, STEP_BATCH};
use crate::signals::SignalFlags;
use crate::vm::{HaltReason, SnapshotError, VMState, VmError, VM};

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Halted(HaltReason),
    /// A stop was requested; the snapshot was written to this path.
    Stopped(PathBuf),
    /// Input ended while the program was waiting for more.
    InputClosed,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Vm(#[from] VmError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub struct Runner<'a, W: Write> {
    vm: &'a mut VM,
    console: &'a Console,
    signals: &'a SignalFlags,
    save_dir: &'a Path,
    out: W,
}

impl<'a, W: Write> Runner<'a, W> {
    pub fn new(
        vm: &'a mut VM,
        console: &'a Console,
        signals: &'a SignalFlags,
        save_dir: &'a Path,
        out: W,
    ) -> Self {
        Self { vm, console, signals, save_dir, out }
    }

    pub fn run(&mut self) -> Result<RunOutcome, RunError> {
        loop {
            let result = self.vm.run_for(STEP_BATCH);
            self.flush_output()?;
            result?;

            // A finished program is reported as such, never snapshotted.
            if let VMState::Halted(reason) = self.vm.state {
                return Ok(RunOutcome::Halted(reason));
            }

            if let Some(outcome) = self.check_signals()? {
                return Ok(outcome);
            }

            match self.vm.state {
                VMState::WaitingForInput if self.vm.input_buffer.is_empty() => {
                    if let Some(outcome) = self.wait_for_input()? {
                        return Ok(outcome);
                    }
                }
                _ => {}
            }
        }
    }

    fn flush_output(&mut self) -> io::Result<()> {
        let output = self.vm.get_output();
        if !output.is_empty() {
            self.out.write_all(output.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn check_signals(&mut self) -> Result<Option<RunOutcome>, RunError> {
        if self.signals.stop_requested() {
            let path = self.vm.snapshot().save_timestamped(self.save_dir)?;
            return Ok(Some(RunOutcome::Stopped(path)));
        }
        if self.signals.take_save_request() {
            let path = self.vm.snapshot().save_timestamped(self.save_dir)?;
            eprintln!("Saved state to {}", path.display());
        }
        Ok(None)
    }

    fn wait_for_input(&mut self) -> Result<Option<RunOutcome>, RunError> {
        let interval = Duration::from_millis(INPUT_POLL_INTERVAL_MS);
        loop {
            match self.console.poll_line(interval) {
                InputEvent::Line(line) => {
                    self.vm.push_input_line(&line);
                    return Ok(None);
                }
                InputEvent::Closed => {
                    log::warn!("Input closed while the program was waiting for input");
                    return Ok(Some(RunOutcome::InputClosed));
                }
                InputEvent::Timeout => {
                    if let Some(outcome) = self.check_signals()? {
                        return Ok(Some(outcome));
                    }
                }
            }
        }
    }
}
