//! Static decoding of memory images into instructions.
//!
//! The decoder shares the instruction table with the execution engine but
//! never evaluates anything: registers are rendered by name, not by value.
//! Positions that do not hold a well-formed instruction decode as a single
//! data word so a scan can run across code and embedded data alike.

use std::fmt;

use crate::opcode::{lookup, Opcode};
use crate::types::{classify, Operand, Word};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedKind {
    Instruction { opcode: Opcode, operands: Vec<Operand> },
    Data(Word),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub address: usize,
    pub length: usize,
    pub kind: DecodedKind,
}

impl Decoded {
    pub fn is_data(&self) -> bool {
        matches!(self.kind, DecodedKind::Data(_))
    }

    /// Mnemonic followed by rendered operands, without the address.
    pub fn fields(&self) -> Vec<String> {
        match &self.kind {
            DecodedKind::Data(raw) => vec!["DATA".to_string(), raw.to_string()],
            DecodedKind::Instruction { opcode, operands } => {
                let mut fields = vec![opcode.to_str().to_string()];
                fields.extend(operands.iter().map(|operand| render_operand(*opcode, operand)));
                fields
            }
        }
    }

    /// Rendering without the address, fields separated by single spaces.
    pub fn text(&self) -> String {
        self.fields().join(" ")
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.address, self.fields().join("\t"))
    }
}

fn render_operand(opcode: Opcode, operand: &Operand) -> String {
    match (opcode, operand) {
        // The printed character is only known statically for literals.
        (Opcode::Out, Operand::Literal(code)) => match char::from_u32(*code as u32) {
            Some(c) => format!("'{}'", c.escape_default()),
            None => code.to_string(),
        },
        _ => operand.to_string(),
    }
}

/// Decode the word at `pos`, falling back to a data word when it is not a
/// complete, well-formed instruction.
pub fn decode(memory: &[Word], pos: usize) -> Decoded {
    let raw = memory.get(pos).copied().unwrap_or(0);
    let data = Decoded {
        address: pos,
        length: 1,
        kind: DecodedKind::Data(raw),
    };

    let instr = match lookup(raw) {
        Ok(instr) => instr,
        Err(_) => return data,
    };

    let end = pos + instr.length();
    if end > memory.len() {
        return data;
    }

    let operands = match memory[pos + 1..end].iter().map(|&w| classify(w)).collect::<Result<Vec<_>, _>>() {
        Ok(operands) => operands,
        Err(_) => return data,
    };

    Decoded {
        address: pos,
        length: instr.length(),
        kind: DecodedKind::Instruction {
            opcode: instr.opcode,
            operands,
        },
    }
}

/// Linear scan of a memory image from a starting position to its end.
pub struct Disassembly<'a> {
    memory: &'a [Word],
    pos: usize,
}

impl<'a> Disassembly<'a> {
    pub fn new(memory: &'a [Word], start: usize) -> Self {
        Self { memory, pos: start }
    }
}

impl Iterator for Disassembly<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        if self.pos >= self.memory.len() {
            return None;
        }
        let decoded = decode(self.memory, self.pos);
        self.pos += decoded.length;
        Some(decoded)
    }
}
