pub mod types;
pub mod opcode;
pub mod decoder;
pub mod image;
pub mod error;

pub use types::{
    classify, Operand, Register, Word, LITERAL_MASK, MAX_LITERAL, MAX_REGISTER_WORD,
    MEMORY_SIZE, MODULUS, REGISTER_BASE, REGISTER_COUNT,
};
pub use opcode::{lookup, Instruction, Opcode, INSTRUCTION_TABLE, MAX_ARITY, OPCODE_COUNT};
pub use decoder::{decode, Decoded, DecodedKind, Disassembly};
pub use image::{encode_image, load_image};
pub use error::IsaError;
