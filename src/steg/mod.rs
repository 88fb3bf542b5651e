//! Core hide/recover workflow over a PNG held in memory

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::offset::resolve;
use crate::png::{validate_signature, Chunk, ChunkReader, PositionedChunk, SIGNATURE_LEN};
use crate::splice::{splice_to_path, SpliceMode};
use crate::xor::XorCipher;
use crate::{StegError, StegResult};

/// Outcome of inserting a chunk
#[derive(Debug, Clone)]
pub struct SpliceReport {
    pub output: PathBuf,
    pub offset: u64,
    /// The chunk as written, data already encoded
    pub chunk: Chunk,
    /// Size of the output file
    pub written: u64,
}

/// Outcome of decoding the chunk at an offset
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub offset: u64,
    /// Chunk as found in the input
    pub original: Chunk,
    /// Same chunk with decoded data and a fresh CRC
    pub decoded: Chunk,
    /// Set when the decoded chunk was written back to a file
    pub output: Option<PathBuf>,
}

impl DecodeReport {
    pub fn plaintext(&self) -> &[u8] {
        self.decoded.data()
    }
}

/// A validated PNG plus the operations that hide payloads in it.
///
/// The whole input is held in memory; every operation reads from that copy
/// and never touches the input file again.
#[derive(Debug)]
pub struct Steg {
    reader: ChunkReader<Cursor<Vec<u8>>>,
}

impl Steg {
    /// Load and validate the PNG at `path`
    pub fn open(path: &Path) -> StegResult<Self> {
        let data = fs::read(path)?;
        Self::from_data(data)
    }

    /// Validate in-memory PNG data
    pub fn from_data(data: Vec<u8>) -> StegResult<Self> {
        let mut cursor = Cursor::new(data);
        validate_signature(&mut cursor)?;
        let reader = ChunkReader::new(cursor)?;

        info!(len = reader.len(), "valid PNG loaded");
        Ok(Self { reader })
    }

    pub fn len(&self) -> u64 {
        self.reader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.reader.get_ref().get_ref()
    }

    /// All chunks from the end of the signature through `IEND`
    pub fn chunks(&mut self) -> StegResult<Vec<PositionedChunk>> {
        self.reader.seek_to(SIGNATURE_LEN)?;
        let chunks = self.reader.read_until_end()?;

        for positioned in chunks.iter().filter(|c| !c.chunk.has_valid_crc()) {
            warn!(
                offset = positioned.offset,
                chunk_type = %positioned.chunk.chunk_type(),
                "stored CRC does not match chunk data"
            );
        }
        Ok(chunks)
    }

    /// XOR the payload with the key and insert it as a new chunk
    pub fn encode(&mut self, config: &Config) -> StegResult<SpliceReport> {
        let cipher = XorCipher::new(config.key.clone())?;
        self.insert(config, cipher.encode(&config.payload))
    }

    /// Insert the payload unmodified as a new chunk
    pub fn inject(&mut self, config: &Config) -> StegResult<SpliceReport> {
        self.insert(config, config.payload.clone())
    }

    /// Decode the chunk at the offset, optionally writing the decoded chunk
    /// over the original in a copy of the file
    pub fn decode(&mut self, config: &Config) -> StegResult<DecodeReport> {
        let cipher = XorCipher::new(config.key.clone())?;
        let offset = resolve(&config.offset, self.len())?;

        self.reader.seek_to(offset)?;
        let original = self.reader.read_chunk()?.chunk;
        if original.size() == 0 {
            return Err(StegError::EmptyChunk(offset));
        }

        let mut decoded = original.clone();
        decoded.set_data(cipher.decode(original.data()))?;

        if let Some(output) = config.output.as_deref() {
            // Same size as the original, so replace skips exactly the old chunk
            splice_to_path(
                self.reader.get_mut(),
                output,
                offset as i64,
                &decoded.to_bytes(),
                SpliceMode::Replace,
            )?;
        }

        info!(offset, size = decoded.size(), chunk_type = %decoded.chunk_type(), "payload decoded");
        Ok(DecodeReport {
            offset,
            original,
            decoded,
            output: config.output.clone(),
        })
    }

    fn insert(&mut self, config: &Config, data: Vec<u8>) -> StegResult<SpliceReport> {
        let output = config.output.as_deref().ok_or(StegError::MissingOutput)?;
        let offset = resolve(&config.offset, self.len())?;
        let chunk = Chunk::new(config.chunk_type, data)?;

        let written = splice_to_path(
            self.reader.get_mut(),
            output,
            offset as i64,
            &chunk.to_bytes(),
            SpliceMode::Insert,
        )?;

        info!(offset, size = chunk.size(), chunk_type = %chunk.chunk_type(), "chunk inserted");
        Ok(SpliceReport {
            output: output.to_path_buf(),
            offset,
            chunk,
            written,
        })
    }
}
