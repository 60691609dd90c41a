//! Saving and restoring the complete state of a machine.
//!
//! A snapshot holds everything needed to resume execution: memory,
//! registers, stack, pc and any input that was typed but not yet read.
//! A halted machine also records why it halted, so it stays halted.
//! On disk it is a JSON document.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use synacor_isa::{Word, MEMORY_SIZE, REGISTER_COUNT};
use thiserror::Error;

use super::{HaltReason, VMState, VmError, VM};
use crate::constants::{SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX, SNAPSHOT_VERSION};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub memory: Vec<Word>,
    pub registers: [Word; REGISTER_COUNT],
    pub stack: Vec<Word>,
    pub pc: usize,
    pub input_buffer: Vec<Word>,
    #[serde(default)]
    pub halted: Option<HaltReason>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Save under `dir` with a name derived from the current time.
    pub fn save_timestamped(&self, dir: &Path) -> Result<PathBuf, SnapshotError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = dir.join(format!("{SNAPSHOT_PREFIX}{millis}.{SNAPSHOT_EXTENSION}"));
        self.save(&path)?;
        log::info!("Saved snapshot to {}", path.display());
        Ok(path)
    }
}

impl VM {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            memory: self.memory.clone(),
            registers: self.registers,
            stack: self.stack.clone(),
            pc: self.pc,
            input_buffer: self.input_buffer.iter().copied().collect(),
            halted: match self.state {
                VMState::Halted(reason) => Some(reason),
                _ => None,
            },
        }
    }

    /// Rebuild a machine from a snapshot. It is ready to run unless the
    /// snapshot was taken after a halt.
    pub fn restore(snapshot: Snapshot) -> Result<VM, VmError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(VmError::InvalidSnapshot(format!(
                "unsupported version {}",
                snapshot.version
            )));
        }
        if snapshot.memory.len() != MEMORY_SIZE {
            return Err(VmError::InvalidSnapshot(format!(
                "memory holds {} words, expected {MEMORY_SIZE}",
                snapshot.memory.len()
            )));
        }
        if snapshot.pc > MEMORY_SIZE {
            return Err(VmError::InvalidSnapshot(format!("pc {} is out of range", snapshot.pc)));
        }

        let mut vm = VM::new();
        vm.memory = snapshot.memory;
        vm.registers = snapshot.registers;
        vm.stack = snapshot.stack;
        vm.pc = snapshot.pc;
        vm.input_buffer = snapshot.input_buffer.into();
        vm.state = match snapshot.halted {
            Some(reason) => VMState::Halted(reason),
            None => VMState::Running,
        };
        log::info!("Restored machine at pc={} with {} stacked words", vm.pc, vm.stack.len());
        Ok(vm)
    }
}
