//! Utility functions for PNG chunk operations

use crc32fast::Hasher;

/// Full 8-byte PNG signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Calculate CRC32 (IEEE) checksum over several byte slices, in order
pub fn calculate_crc32(parts: &[&[u8]]) -> u32 {
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Render bytes as space separated upper-case hex ("DE AD BE EF")
pub fn hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
