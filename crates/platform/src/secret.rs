//! Reversible obfuscation for passwords stored in connection files. This
//! keeps credentials out of plain sight, it is not at-rest encryption.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use crate::error::SecretError;

/// Key used when [`KEY_ENV_VAR`] is not set. Secrets obfuscated with the
/// default key are portable between installations.
pub const DEFAULT_KEY: &str = ";Op5~pK{31AIN^eH~Ab`:Yaikm8CM`8_Dw:1Kl4_WHrvuAXO";

pub const KEY_ENV_VAR: &str = "WEIR_SECRET_KEY";

pub fn active_key() -> String {
    std::env::var(KEY_ENV_VAR).unwrap_or_else(|_| DEFAULT_KEY.to_string())
}

pub fn encrypt(plain: &str, key: &str) -> String {
    let stream = keystream(key, plain.len());
    let masked: Vec<u8> = plain
        .as_bytes()
        .iter()
        .zip(stream)
        .map(|(byte, mask)| byte ^ mask)
        .collect();
    STANDARD.encode(masked)
}

pub fn decrypt(encoded: &str, key: &str) -> Result<String, SecretError> {
    let masked = STANDARD.decode(encoded.trim())?;
    let stream = keystream(key, masked.len());
    let plain: Vec<u8> = masked
        .iter()
        .zip(stream)
        .map(|(byte, mask)| byte ^ mask)
        .collect();
    Ok(String::from_utf8(plain)?)
}

/// SHA-256 based keystream: hash(key || counter) blocks concatenated until
/// `len` bytes are available.
fn keystream(key: &str, len: usize) -> Vec<u8> {
    let mut stream = Vec::with_capacity(len + 32);
    let mut counter: u64 = 0;
    while stream.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hasher.update(counter.to_le_bytes());
        stream.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    stream.truncate(len);
    stream
}
