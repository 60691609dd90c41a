//! Errors raised while classifying operands, looking up opcodes and
//! decoding binary images.

use thiserror::Error;

use crate::types::Word;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsaError {
    #[error("illegal operand {0}: not a literal (0..=32767) or a register (32768..=32775)")]
    IllegalOperand(Word),

    #[error("unknown opcode {0}")]
    UnknownOpcode(Word),

    #[error("image has an odd length of {0} bytes")]
    OddImageLength(usize),

    #[error("image of {0} words does not fit in memory")]
    ImageTooLarge(usize),
}
