use crate::error::IsaError;
use crate::types::{Word, MEMORY_SIZE};

/// Decode a program image: a sequence of 16-bit little-endian words.
pub fn load_image(bytes: &[u8]) -> Result<Vec<Word>, IsaError> {
    if bytes.len() % 2 != 0 {
        return Err(IsaError::OddImageLength(bytes.len()));
    }
    let words = bytes.len() / 2;
    if words > MEMORY_SIZE {
        return Err(IsaError::ImageTooLarge(words));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Encode words back into the little-endian image format.
pub fn encode_image(words: &[Word]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
