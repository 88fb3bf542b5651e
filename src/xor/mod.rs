//! Repeating-key XOR used to obscure payloads.
//!
//! This is not encryption. Anyone holding the file can recover a short key
//! from known plaintext; it only keeps payloads from showing up in a casual
//! `strings` dump.

use crate::{StegError, StegResult};

/// Repeating-key XOR cipher. The same transform encodes and decodes.
#[derive(Debug, Clone)]
pub struct XorCipher {
    key: Vec<u8>,
}

impl XorCipher {
    /// Fails with [`StegError::InvalidKey`] for an empty key
    pub fn new(key: impl Into<Vec<u8>>) -> StegResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(StegError::InvalidKey);
        }
        Ok(Self { key })
    }

    /// `output[i] = input[i] ^ key[i % key.len()]`
    pub fn apply(&self, input: &[u8]) -> Vec<u8> {
        input
            .iter()
            .zip(self.key.iter().cycle())
            .map(|(byte, k)| byte ^ k)
            .collect()
    }

    pub fn encode(&self, plaintext: &[u8]) -> Vec<u8> {
        self.apply(plaintext)
    }

    pub fn decode(&self, encoded: &[u8]) -> Vec<u8> {
        self.apply(encoded)
    }
}
