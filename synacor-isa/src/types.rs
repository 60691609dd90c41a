use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IsaError;

/// A machine word. Only the low 15 bits carry data; 32768..=32775 name registers.
pub type Word = u16;

/// Arithmetic is performed modulo this value.
pub const MODULUS: u32 = 32768;
pub const MAX_LITERAL: Word = 32767;
pub const LITERAL_MASK: Word = 0x7FFF;

pub const REGISTER_COUNT: usize = 8;
pub const REGISTER_BASE: Word = 32768;
pub const MAX_REGISTER_WORD: Word = REGISTER_BASE + REGISTER_COUNT as Word - 1;

/// Number of addressable words (15-bit address space).
pub const MEMORY_SIZE: usize = 32768;

/// One of the eight general registers, `r0`..`r7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Register(u8);

impl Register {
    pub fn new(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Register(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw word that encodes this register in an instruction stream.
    pub fn to_word(self) -> Word {
        REGISTER_BASE + self.0 as Word
    }

    pub fn all() -> impl Iterator<Item = Register> {
        (0..REGISTER_COUNT as u8).map(Register)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Literal(Word),
    Register(Register),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{value}"),
            Operand::Register(reg) => write!(f, "{reg}"),
        }
    }
}

/// Classify a raw operand word as a literal or a register reference.
pub fn classify(raw: Word) -> Result<Operand, IsaError> {
    match raw {
        0..=MAX_LITERAL => Ok(Operand::Literal(raw)),
        REGISTER_BASE..=MAX_REGISTER_WORD => Ok(Operand::Register(Register((raw - REGISTER_BASE) as u8))),
        _ => Err(IsaError::IllegalOperand(raw)),
    }
}
