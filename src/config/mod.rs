//! Run configuration, built once and handed to every operation

use std::path::PathBuf;

use crate::png::ChunkType;

/// Everything one invocation needs. The library reads no global state.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source PNG
    pub input: PathBuf,
    /// Destination; required to encode or inject, optional to decode
    pub output: Option<PathBuf>,
    /// XOR key, must be non-empty when encoding or decoding
    pub key: Vec<u8>,
    /// Type tag of the injected chunk
    pub chunk_type: ChunkType,
    pub payload: Vec<u8>,
    /// Decimal or `0x`-prefixed hex byte offset
    pub offset: String,
    /// Leave chunk data out of listings
    pub suppress: bool,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_chunk_type(mut self, chunk_type: ChunkType) -> Self {
        self.chunk_type = chunk_type;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = offset.into();
        self
    }

    pub fn with_suppress(mut self, suppress: bool) -> Self {
        self.suppress = suppress;
        self
    }
}
