use synacor_isa::{IsaError, Word};
use thiserror::Error;

/// Fatal machine errors. Every one of them ends the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("cannot load image: {0}")]
    Image(#[from] IsaError),

    #[error("illegal operand {raw} in instruction at {address}")]
    IllegalOperand { raw: Word, address: usize },

    #[error("unknown opcode {opcode} at {address}")]
    UnknownOpcode { opcode: Word, address: usize },

    #[error("instruction at {address} writes to {raw}, which is not a register")]
    InvalidRegister { raw: Word, address: usize },

    #[error("pop from empty stack at {address}")]
    StackUnderflow { address: usize },

    #[error("mod by zero at {address}")]
    DivisionByZero { address: usize },

    #[error("in at {address} executed with no input queued")]
    InputUnavailable { address: usize },

    #[error("instruction at {address} runs past the end of memory")]
    TruncatedInstruction { address: usize },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
