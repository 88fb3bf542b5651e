//! Chunk framing decoder over a seekable byte source

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use tracing::debug;

use super::{Chunk, ChunkType, PositionedChunk};
use crate::{StegError, StegResult};

/// Reads chunks one after another, recording where each one starts.
///
/// This is a pure framing decoder: it does not check chunk order, content or
/// stored CRCs.
#[derive(Debug)]
pub struct ChunkReader<R> {
    reader: R,
    len: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Wrap a source, leaving its cursor where it is
    pub fn new(mut reader: R) -> StegResult<Self> {
        let position = reader.stream_position()?;
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(position))?;
        Ok(Self { reader, len })
    }

    /// Total length of the source in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position
    pub fn position(&mut self) -> StegResult<u64> {
        Ok(self.reader.stream_position()?)
    }

    /// Move the cursor, e.g. to restart enumeration at a known chunk offset
    pub fn seek_to(&mut self, offset: u64) -> StegResult<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Read the chunk starting at the current cursor
    pub fn read_chunk(&mut self) -> StegResult<PositionedChunk> {
        let offset = self.reader.stream_position()?;

        let size = self.read_field(offset, "size")?;
        let chunk_type = ChunkType::from_u32(self.read_field(offset, "type")?);

        // Bounded by what the source holds, not by the declared size
        let mut data = Vec::new();
        let read = (&mut self.reader).take(u64::from(size)).read_to_end(&mut data)?;
        if read < size as usize {
            return Err(StegError::ShortRead {
                offset,
                field: "data",
            });
        }

        let crc = self.read_field(offset, "crc")?;

        debug!(offset, size, chunk_type = %chunk_type, crc, "read chunk");
        Ok(PositionedChunk {
            offset,
            chunk: Chunk::from_parts(chunk_type, data, crc)?,
        })
    }

    /// Lazily iterate over chunks from the current cursor to end of source
    pub fn chunks(&mut self) -> Chunks<'_, R> {
        Chunks {
            reader: self,
            done: false,
        }
    }

    /// Read chunks up to and including the first `IEND`.
    ///
    /// A source that ends cleanly without `IEND` yields what was found.
    pub fn read_until_end(&mut self) -> StegResult<Vec<PositionedChunk>> {
        let mut chunks = Vec::new();
        for chunk in self.chunks() {
            let chunk = chunk?;
            let is_end = chunk.chunk.chunk_type().is_end();
            chunks.push(chunk);
            if is_end {
                break;
            }
        }
        Ok(chunks)
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    fn read_field(&mut self, offset: u64, field: &'static str) -> StegResult<u32> {
        self.reader.read_u32::<BigEndian>().map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => StegError::ShortRead { offset, field },
            _ => StegError::Io(e),
        })
    }
}

/// Iterator returned by [`ChunkReader::chunks`].
///
/// Ends at a clean end of source; stops after the first error.
pub struct Chunks<'a, R> {
    reader: &'a mut ChunkReader<R>,
    done: bool,
}

impl<R: Read + Seek> Iterator for Chunks<'_, R> {
    type Item = StegResult<PositionedChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = match self.reader.position() {
            Ok(position) if position >= self.reader.len => {
                self.done = true;
                return None;
            }
            Ok(_) => self.reader.read_chunk(),
            Err(e) => Err(e),
        };

        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
