// Pad <-> text. Keys travel as flat base64 text files.

use base64::{engine::general_purpose, Engine as _};

use crate::cipher::CipherError;

pub fn encode(pad: &[u8]) -> String {
    general_purpose::STANDARD.encode(pad)
}

/// Parse a base64 key back into pad bytes.
///
/// Surrounding whitespace is tolerated (key files usually end with a
/// newline); anything malformed beyond that is rejected outright rather
/// than decoded into a truncated pad.
pub fn parse(text: &str) -> Result<Vec<u8>, CipherError> {
    general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|e| CipherError::InvalidKey(format!("malformed base64 key: {}", e)))
}
