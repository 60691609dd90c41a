use serde::{Deserialize, Serialize};
use std::fmt;

use super::VmError;

/// VM execution states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VMState {
    Running,
    WaitingForInput, // `in` found the input queue empty; pc still points at it
    Halted(HaltReason),
    Error(VmError),
}

/// Why a machine stopped without error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    Halt,
    ReturnFromEmptyStack,
    EndOfMemory,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Halt => write!(f, "halt instruction"),
            HaltReason::ReturnFromEmptyStack => write!(f, "ret with an empty stack"),
            HaltReason::EndOfMemory => write!(f, "execution reached end of memory"),
        }
    }
}
