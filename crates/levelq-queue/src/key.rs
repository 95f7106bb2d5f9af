//! Identifier to key mapping.
//!
//! Keys are the big-endian bytes of the identifier, so byte-wise key order in
//! the store is numeric identifier order.

use crate::error::QueueError;

/// Width of every stored key.
pub const KEY_LEN: usize = 8;

/// Encode an identifier as a store key.
pub fn encode(id: u64) -> [u8; KEY_LEN] {
    id.to_be_bytes()
}

/// Decode a store key back into its identifier.
pub fn decode(key: &[u8]) -> Result<u64, QueueError> {
    let bytes: [u8; KEY_LEN] = key
        .try_into()
        .map_err(|_| QueueError::InvalidKey(key.len()))?;
    Ok(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_big_endian() {
        assert_eq!(encode(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(encode(0x0102), [0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for id in [0, 1, 255, 256, u32::MAX as u64, u64::MAX >> 2] {
            assert_eq!(decode(&encode(id)).unwrap(), id);
        }
    }

    #[test]
    fn test_key_order_matches_id_order() {
        let ids = [0u64, 1, 2, 255, 256, 65_535, 65_536, 1 << 40];
        for pair in ids.windows(2) {
            assert!(encode(pair[0]) < encode(pair[1]));
        }
    }

    #[test]
    fn test_decode_wrong_width() {
        assert!(matches!(decode(&[1, 2, 3]), Err(QueueError::InvalidKey(3))));
        assert!(matches!(decode(&[0; 9]), Err(QueueError::InvalidKey(9))));
    }
}
