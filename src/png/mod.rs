//! PNG signature check and chunk model

pub mod parser;

use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use byteorder::{BigEndian, ReadBytesExt};
use tracing::debug;

use crate::utils::calculate_crc32;
use crate::{StegError, StegResult};
pub use parser::{ChunkReader, Chunks};

/// Bytes of framing around chunk data: size, type and CRC fields
pub const CHUNK_OVERHEAD: usize = 12;

/// Length of the file signature; the first chunk starts here
pub const SIGNATURE_LEN: u64 = 8;

/// Check that the stream starts with a PNG signature.
///
/// Consumes exactly 8 bytes. Only bytes 1..4 are compared (`PNG`), so a
/// file with a damaged leading byte or line-ending bytes is still accepted.
/// Call once per stream; a second call reads past the signature.
pub fn validate_signature<R: Read>(reader: &mut R) -> StegResult<()> {
    let header = match reader.read_u64::<BigEndian>() {
        Ok(header) => header,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(StegError::Format("shorter than the 8-byte signature".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let bytes = header.to_be_bytes();
    if &bytes[1..4] != b"PNG" {
        return Err(StegError::Format(format!("bad signature {:02X?}", bytes)));
    }

    debug!("PNG signature accepted");
    Ok(())
}

/// Four byte chunk type tag, e.g. `IHDR` or `tEXt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    pub const TEXT: ChunkType = ChunkType(*b"tEXt");
    pub const IEND: ChunkType = ChunkType(*b"IEND");

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Build from the raw big-endian 32-bit value of the tag
    pub fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether this is the terminal `IEND` chunk
    pub fn is_end(&self) -> bool {
        *self == Self::IEND
    }
}

impl Default for ChunkType {
    fn default() -> Self {
        Self::TEXT
    }
}

impl FromStr for ChunkType {
    type Err = StegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| StegError::InvalidChunkType(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Convert a data length to the 32-bit chunk size field
pub fn checked_size(len: usize) -> StegResult<u32> {
    u32::try_from(len).map_err(|_| StegError::ChunkTooLarge(len))
}

/// PNG chunk structure.
///
/// `size` always equals the data length. Chunks built here carry the CRC of
/// type + data; chunks read from a file keep whatever CRC the file stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    size: u32,
    chunk_type: ChunkType,
    data: Vec<u8>,
    crc: u32,
}

impl Chunk {
    /// Build a chunk, computing size and CRC from the data
    pub fn new(chunk_type: ChunkType, data: Vec<u8>) -> StegResult<Self> {
        let size = checked_size(data.len())?;
        let crc = Self::compute_crc(chunk_type, &data);
        Ok(Self {
            size,
            chunk_type,
            data,
            crc,
        })
    }

    /// Chunk exactly as framed in a file; the CRC is not checked
    pub(crate) fn from_parts(chunk_type: ChunkType, data: Vec<u8>, crc: u32) -> StegResult<Self> {
        let size = checked_size(data.len())?;
        Ok(Self {
            size,
            chunk_type,
            data,
            crc,
        })
    }

    /// CRC32 over the type tag followed by the data. The size field is never included.
    pub fn compute_crc(chunk_type: ChunkType, data: &[u8]) -> u32 {
        calculate_crc32(&[chunk_type.bytes().as_slice(), data])
    }

    /// Replace the data, then recompute size and CRC in that order
    pub fn set_data(&mut self, data: Vec<u8>) -> StegResult<()> {
        self.size = checked_size(data.len())?;
        self.data = data;
        self.crc = Self::compute_crc(self.chunk_type, &self.data);
        Ok(())
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Whether the stored CRC matches type + data
    pub fn has_valid_crc(&self) -> bool {
        self.crc == Self::compute_crc(self.chunk_type, &self.data)
    }

    /// Length of the marshaled chunk in bytes
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.data.len()
    }

    /// Marshal as `size | type | data | crc`, integers big-endian
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.size.to_be_bytes());
        bytes.extend_from_slice(self.chunk_type.bytes());
        bytes.extend_from_slice(&self.data);
        bytes.extend_from_slice(&self.crc.to_be_bytes());
        bytes
    }
}

/// A chunk plus the stream offset of its size field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedChunk {
    pub offset: u64,
    pub chunk: Chunk,
}

/// Minimal PNG (signature, 1x1 IHDR, IEND) for tests
#[cfg(test)]
pub(crate) fn create_test_png() -> Vec<u8> {
    let mut png = crate::utils::PNG_SIGNATURE.to_vec();

    let ihdr_data = vec![
        0x00, 0x00, 0x00, 0x01, // width = 1
        0x00, 0x00, 0x00, 0x01, // height = 1
        0x08, // bit depth = 8
        0x02, // color type = 2 (RGB)
        0x00, // compression = 0
        0x00, // filter = 0
        0x00, // interlace = 0
    ];
    let ihdr = Chunk::new(ChunkType::new(*b"IHDR"), ihdr_data).unwrap();
    png.extend_from_slice(&ihdr.to_bytes());

    let iend = Chunk::new(ChunkType::IEND, Vec::new()).unwrap();
    png.extend_from_slice(&iend.to_bytes());

    png
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::{Cursor, Seek};

    #[test]
    fn test_signature_accepted() {
        let mut cursor = Cursor::new(create_test_png());
        validate_signature(&mut cursor).unwrap();
        assert_eq!(cursor.stream_position().unwrap(), 8);
    }

    #[test]
    fn test_signature_only_checks_png_letters() {
        let mut data = create_test_png();
        data[0] = 0x00;
        data[7] = 0xFF;
        assert!(validate_signature(&mut Cursor::new(data)).is_ok());
    }

    #[test]
    fn test_invalid_signature() {
        let mut data = create_test_png();
        data[2] = b'X'; // "PXG"
        let mut cursor = Cursor::new(data);
        let result = validate_signature(&mut cursor);
        assert!(matches!(result, Err(StegError::Format(_))));
        assert_eq!(cursor.stream_position().unwrap(), 8);
    }

    #[test]
    fn test_signature_too_short() {
        let result = validate_signature(&mut Cursor::new(vec![0x89, b'P', b'N']));
        assert!(matches!(result, Err(StegError::Format(_))));
    }

    #[test]
    fn test_chunk_type_parsing() {
        let tag: ChunkType = "tEXt".parse().unwrap();
        assert_eq!(tag, ChunkType::TEXT);
        assert_eq!(tag.as_u32(), 0x74455874);
        assert_eq!(ChunkType::from_u32(0x49454E44), ChunkType::IEND);
        assert!(ChunkType::IEND.is_end());
        assert_eq!(ChunkType::IEND.to_string(), "IEND");

        assert!(matches!("txt".parse::<ChunkType>(), Err(StegError::InvalidChunkType(_))));
        assert!(matches!("tEXtt".parse::<ChunkType>(), Err(StegError::InvalidChunkType(_))));
    }

    #[test]
    fn test_marshal_layout() {
        let chunk = Chunk::new(ChunkType::TEXT, vec![0x03, 0x02]).unwrap();
        assert_eq!(chunk.size(), 2);
        assert_eq!(chunk.crc(), 0x2900EC63);
        assert_eq!(
            chunk.to_bytes(),
            vec![
                0x00, 0x00, 0x00, 0x02, // size
                b't', b'E', b'X', b't', // type
                0x03, 0x02, // data
                0x29, 0x00, 0xEC, 0x63, // crc
            ]
        );
        assert_eq!(chunk.encoded_len(), 14);
    }

    #[test]
    fn test_empty_iend_crc() {
        let iend = Chunk::new(ChunkType::IEND, Vec::new()).unwrap();
        assert_eq!(iend.crc(), 0xAE426082);
        assert_eq!(iend.to_bytes().len(), CHUNK_OVERHEAD);
    }

    #[test]
    fn test_set_data_recomputes_size_and_crc() {
        let mut chunk = Chunk::from_parts(ChunkType::TEXT, b"old".to_vec(), 0xDEADBEEF).unwrap();
        assert!(!chunk.has_valid_crc());

        chunk.set_data(b"longer data".to_vec()).unwrap();
        assert_eq!(chunk.size(), 11);
        assert!(chunk.has_valid_crc());
        assert_eq!(chunk.crc(), calculate_crc32(&[b"tEXt".as_slice(), b"longer data"]));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_oversized_chunk_rejected() {
        let len = u32::MAX as usize + 1;
        assert!(matches!(checked_size(len), Err(StegError::ChunkTooLarge(l)) if l == len));
        assert_eq!(checked_size(u32::MAX as usize).unwrap(), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_crc_never_covers_size(
            tag in any::<[u8; 4]>(),
            data in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let chunk_type = ChunkType::new(tag);
            let mut chunk = Chunk::new(chunk_type, Vec::new()).unwrap();
            chunk.set_data(data.clone()).unwrap();
            let expected = crc32fast::hash(&[tag.as_slice(), &data[..]].concat());
            prop_assert_eq!(chunk.crc(), expected);
            prop_assert_eq!(chunk.size() as usize, data.len());
        }
    }
}
