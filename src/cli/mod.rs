//! Console rendering for chunk listings and payload dumps

use crate::png::PositionedChunk;
use crate::utils::hex_spaced;

/// Describe one chunk of a listing. `index` is 1-based.
pub fn render_chunk(index: usize, positioned: &PositionedChunk, suppress: bool) -> String {
    let chunk = &positioned.chunk;
    let mut lines = vec![
        format!("---- Chunk # {} ----", index),
        format!("Chunk Offset: {:#04x}", positioned.offset),
        format!("Chunk Length: {} bytes", chunk.size()),
        format!("Chunk Type: {}", chunk.chunk_type()),
    ];
    if !suppress {
        lines.push(format!("Chunk Data: {}", hex_spaced(chunk.data())));
    }
    let crc_note = if chunk.has_valid_crc() { "" } else { " (mismatch)" };
    lines.push(format!("Chunk CRC: {:#010x}{}", chunk.crc(), crc_note));

    lines.join("\n")
}

/// `label: 68 69` style hex dump of a payload
pub fn render_payload(label: &str, bytes: &[u8]) -> String {
    format!("{}: {}", label, hex_spaced(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::{Chunk, ChunkType};

    fn positioned(data: &[u8]) -> PositionedChunk {
        PositionedChunk {
            offset: 8,
            chunk: Chunk::new(ChunkType::TEXT, data.to_vec()).unwrap(),
        }
    }

    #[test]
    fn test_render_chunk() {
        let text = render_chunk(1, &positioned(&[0x03, 0x02]), false);
        assert_eq!(
            text,
            "---- Chunk # 1 ----\n\
             Chunk Offset: 0x08\n\
             Chunk Length: 2 bytes\n\
             Chunk Type: tEXt\n\
             Chunk Data: 03 02\n\
             Chunk CRC: 0x2900ec63"
        );
    }

    #[test]
    fn test_render_chunk_suppressed() {
        let text = render_chunk(2, &positioned(b"secret"), true);
        assert!(text.starts_with("---- Chunk # 2 ----"));
        assert!(!text.contains("Chunk Data"));
    }

    #[test]
    fn test_render_payload() {
        assert_eq!(render_payload("Payload Original", b"hi"), "Payload Original: 68 69");
    }
}
