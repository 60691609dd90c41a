use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IsaError;
use crate::types::Word;

pub const OPCODE_COUNT: usize = 22;
pub const MAX_ARITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Opcode {
    Halt = 0,
    Set = 1,
    Push = 2,
    Pop = 3,
    Eq = 4,
    Gt = 5,
    Jmp = 6,
    Jt = 7,
    Jf = 8,
    Add = 9,
    Mult = 10,
    Mod = 11,
    And = 12,
    Or = 13,
    Not = 14,
    Rmem = 15,
    Wmem = 16,
    Call = 17,
    Ret = 18,
    Out = 19,
    In = 20,
    Noop = 21,
}

impl Opcode {
    pub fn from_u16(value: Word) -> Option<Self> {
        INSTRUCTION_TABLE.get(value as usize).map(|instr| instr.opcode)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        INSTRUCTION_TABLE
            .iter()
            .find(|instr| instr.name.eq_ignore_ascii_case(s))
            .map(|instr| instr.opcode)
    }

    /// Upper-case mnemonic, as printed in listings.
    pub fn to_str(&self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Set => "SET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Eq => "EQ",
            Opcode::Gt => "GT",
            Opcode::Jmp => "JMP",
            Opcode::Jt => "JT",
            Opcode::Jf => "JF",
            Opcode::Add => "ADD",
            Opcode::Mult => "MULT",
            Opcode::Mod => "MOD",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Rmem => "RMEM",
            Opcode::Wmem => "WMEM",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Out => "OUT",
            Opcode::In => "IN",
            Opcode::Noop => "NOOP",
        }
    }

    pub fn all() -> impl Iterator<Item = Opcode> {
        INSTRUCTION_TABLE.iter().map(|instr| instr.opcode)
    }

    pub fn code(&self) -> Word {
        *self as Word
    }

    pub fn info(&self) -> &'static Instruction {
        &INSTRUCTION_TABLE[*self as usize]
    }

    pub fn arity(&self) -> usize {
        self.info().arity
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Static description of one instruction: its opcode, name and operand count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub name: &'static str,
    pub arity: usize,
}

impl Instruction {
    /// Words occupied by the instruction, opcode included.
    pub fn length(&self) -> usize {
        1 + self.arity
    }
}

const fn entry(opcode: Opcode, name: &'static str, arity: usize) -> Instruction {
    Instruction { opcode, name, arity }
}

/// Indexed by opcode value. Shared by the execution engine and the decoder.
pub static INSTRUCTION_TABLE: [Instruction; OPCODE_COUNT] = [
    entry(Opcode::Halt, "halt", 0),
    entry(Opcode::Set, "set", 2),
    entry(Opcode::Push, "push", 1),
    entry(Opcode::Pop, "pop", 1),
    entry(Opcode::Eq, "eq", 3),
    entry(Opcode::Gt, "gt", 3),
    entry(Opcode::Jmp, "jmp", 1),
    entry(Opcode::Jt, "jt", 2),
    entry(Opcode::Jf, "jf", 2),
    entry(Opcode::Add, "add", 3),
    entry(Opcode::Mult, "mult", 3),
    entry(Opcode::Mod, "mod", 3),
    entry(Opcode::And, "and", 3),
    entry(Opcode::Or, "or", 3),
    entry(Opcode::Not, "not", 2),
    entry(Opcode::Rmem, "rmem", 2),
    entry(Opcode::Wmem, "wmem", 2),
    entry(Opcode::Call, "call", 1),
    entry(Opcode::Ret, "ret", 0),
    entry(Opcode::Out, "out", 1),
    entry(Opcode::In, "in", 1),
    entry(Opcode::Noop, "noop", 0),
];

/// Look up the instruction for a raw opcode word.
pub fn lookup(raw: Word) -> Result<&'static Instruction, IsaError> {
    INSTRUCTION_TABLE
        .get(raw as usize)
        .ok_or(IsaError::UnknownOpcode(raw))
}
