//! # PNG Chunk Steganography Tool
//!
//! This library hides payloads inside PNG files by splicing an extra chunk
//! into the byte stream at an arbitrary offset, optionally obscured with a
//! repeating-key XOR, and recovers them again.
//!
//! The core is a chunk codec (signature check, chunk framing, CRC32) and a
//! splice engine that rewrites the file byte-exactly and atomically.

// Public API exports
pub mod cli;
pub mod config;
pub mod offset;
pub mod png;
pub mod splice;
pub mod steg;
pub mod utils;
pub mod xor;

pub use config::Config;
pub use png::{Chunk, ChunkType, PositionedChunk};
pub use splice::SpliceMode;
pub use steg::{DecodeReport, SpliceReport, Steg};

/// Result type alias for steganography operations
pub type StegResult<T> = Result<T, StegError>;

/// Comprehensive error type for the steganography tool
#[derive(Debug, thiserror::Error)]
pub enum StegError {
    #[error("Not a valid PNG file: {0}")]
    Format(String),

    #[error("Truncated chunk at offset {offset:#x}: stream ended inside the {field} field")]
    ShortRead { offset: u64, field: &'static str },

    #[error("Cipher key must not be empty")]
    InvalidKey,

    #[error("Invalid offset {0:?}")]
    InvalidOffset(String),

    #[error("Offset {offset} is outside the input (length {len})")]
    OffsetOutOfRange { offset: i64, len: u64 },

    #[error("Chunk data of {0} bytes does not fit a 32-bit size field")]
    ChunkTooLarge(usize),

    #[error("Chunk type must be exactly 4 bytes, got {0:?}")]
    InvalidChunkType(String),

    #[error("Chunk at offset {0:#x} has no data to decode")]
    EmptyChunk(u64),

    #[error("No output path configured")]
    MissingOutput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
