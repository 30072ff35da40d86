//! Hex signature patterns.
//!
//! Signatures are written in configuration as hex strings. Whitespace is
//! ignored and an odd number of digits is completed with a leading zero
//! nibble, so `"5 04"` and `"0504"` both decode to `[0x05, 0x04]`.

/// Decode a hex signature into raw bytes.
///
/// Returns an empty vector for an empty (or whitespace-only) pattern.
pub fn decode_hex_pattern(pattern: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let mut digits: String = pattern.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        digits.insert(0, '0');
    }
    hex::decode(digits)
}
