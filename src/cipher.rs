// One-Time-Pad Cipher over decoded pixel bytes.
// XOR is its own inverse, so a single transform serves both directions.
// The pad must be exactly as long as the buffer and never reused.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("secure random source failed: {0}")]
    ResourceExhausted(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("ambiguous zero-length pairing: buffer is {buffer} bytes, pad is {pad} bytes")]
    SizeMismatch { buffer: usize, pad: usize },
}

/// Draw `len` bytes from the OS CSPRNG.
///
/// A failing entropy source is surfaced as `ResourceExhausted`; there is
/// no fallback to a weaker generator.
pub fn generate_pad(len: usize) -> Result<Vec<u8>, CipherError> {
    let mut pad = vec![0u8; len];
    getrandom::fill(&mut pad).map_err(|e| CipherError::ResourceExhausted(e.to_string()))?;
    Ok(pad)
}

/// XOR `buffer` against the leading bytes of `pad`.
///
/// A pad shorter than the buffer is a hard `InvalidKey` error, never a
/// truncated or zero-filled transform. Surplus pad bytes are ignored.
pub fn apply_pad(buffer: &[u8], pad: &[u8]) -> Result<Vec<u8>, CipherError> {
    if buffer.is_empty() != pad.is_empty() {
        return Err(CipherError::SizeMismatch {
            buffer: buffer.len(),
            pad: pad.len(),
        });
    }
    if pad.len() < buffer.len() {
        return Err(CipherError::InvalidKey(format!(
            "pad is {} bytes but the pixel buffer is {} bytes",
            pad.len(),
            buffer.len()
        )));
    }
    Ok(buffer.iter().zip(pad).map(|(b, k)| b ^ k).collect())
}

/// Scramble `buffer` with a fresh pad of matching length.
/// Returns the transformed bytes and the pad; losing the pad makes the
/// output unrecoverable.
pub fn encrypt(buffer: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CipherError> {
    let pad = generate_pad(buffer.len())?;
    let scrambled = apply_pad(buffer, &pad)?;
    Ok((scrambled, pad))
}

/// Recover a buffer scrambled with `pad`.
pub fn decrypt(buffer: &[u8], pad: &[u8]) -> Result<Vec<u8>, CipherError> {
    apply_pad(buffer, pad)
}
