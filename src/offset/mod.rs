//! Parsing and bounds checking of user supplied byte offsets

use crate::{StegError, StegResult};

/// Parse `0x`-prefixed hex or plain decimal into a signed offset.
///
/// The prefix is case-sensitive: `0X1A` is rejected as a malformed decimal.
pub fn parse_offset(text: &str) -> StegResult<i64> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => text.parse::<i64>(),
    };
    parsed.map_err(|_| StegError::InvalidOffset(text.to_string()))
}

/// Check that `offset` points inside a source of `len` bytes
pub fn resolve_offset(offset: i64, len: u64) -> StegResult<u64> {
    match u64::try_from(offset) {
        Ok(position) if position < len => Ok(position),
        _ => Err(StegError::OffsetOutOfRange { offset, len }),
    }
}

/// Parse and bounds check in one step
pub fn resolve(text: &str, len: u64) -> StegResult<u64> {
    resolve_offset(parse_offset(text)?, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_decimal() {
        assert_eq!(parse_offset("0x1A").unwrap(), 26);
        assert_eq!(parse_offset("0x1a").unwrap(), 26);
        assert_eq!(parse_offset("26").unwrap(), 26);
        assert_eq!(parse_offset("0").unwrap(), 0);
    }

    #[test]
    fn test_malformed() {
        for text in ["", "0x", "abc", "0X1A", "12z", "0xZZ", " 8", "99999999999999999999"] {
            assert!(
                matches!(parse_offset(text), Err(StegError::InvalidOffset(ref t)) if t == text),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_bounds() {
        assert_eq!(resolve_offset(0, 45).unwrap(), 0);
        assert_eq!(resolve_offset(44, 45).unwrap(), 44);
        assert!(matches!(
            resolve_offset(45, 45),
            Err(StegError::OffsetOutOfRange { offset: 45, len: 45 })
        ));
        assert!(matches!(resolve_offset(0, 0), Err(StegError::OffsetOutOfRange { .. })));
    }

    #[test]
    fn test_negative_is_out_of_range() {
        assert_eq!(parse_offset("-5").unwrap(), -5);
        assert!(matches!(resolve("-5", 100), Err(StegError::OffsetOutOfRange { offset: -5, .. })));
        assert!(matches!(resolve("0x-5", 100), Err(StegError::OffsetOutOfRange { .. })));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("0x8", 45).unwrap(), 8);
        assert!(matches!(resolve("nope", 45), Err(StegError::InvalidOffset(_))));
        assert!(matches!(resolve("0x2D", 45), Err(StegError::OffsetOutOfRange { .. })));
    }
}
