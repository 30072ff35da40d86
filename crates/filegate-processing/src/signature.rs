//! Byte-signature matching.
//!
//! Patterns are hex strings (see [`decode_hex_pattern`]). A pattern that is
//! not valid hex never matches.

use filegate_core::decode_hex_pattern;

/// True if the decoded pattern occurs anywhere in `buffer`.
///
/// An empty pattern is a configuration defect and never matches.
pub fn magic_bytes_present(buffer: &[u8], pattern: &str) -> bool {
    decode_hex_pattern(pattern)
        .map(|pattern| contains_bytes(buffer, &pattern))
        .unwrap_or(false)
}

/// True if `buffer` starts with the decoded pattern, or the pattern is empty.
pub fn header_matches(buffer: &[u8], pattern: &str) -> bool {
    decode_hex_pattern(pattern)
        .map(|pattern| starts_with_bytes(buffer, &pattern))
        .unwrap_or(false)
}

/// True if `buffer` ends with the decoded pattern, or the pattern is empty.
pub fn footer_matches(buffer: &[u8], pattern: &str) -> bool {
    decode_hex_pattern(pattern)
        .map(|pattern| ends_with_bytes(buffer, &pattern))
        .unwrap_or(false)
}

pub fn contains_bytes(buffer: &[u8], pattern: &[u8]) -> bool {
    !pattern.is_empty()
        && pattern.len() <= buffer.len()
        && buffer.windows(pattern.len()).any(|window| window == pattern)
}

pub fn starts_with_bytes(buffer: &[u8], pattern: &[u8]) -> bool {
    buffer.starts_with(pattern)
}

pub fn ends_with_bytes(buffer: &[u8], pattern: &[u8]) -> bool {
    buffer.ends_with(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

    #[test]
    fn test_magic_bytes_at_any_offset() {
        assert!(magic_bytes_present(&[0xFF, 0xFF, 0x25, 0x50, 0x44, 0x46], "25504446"));
        assert!(!magic_bytes_present(&[0xFF, 0xFF, 0x25, 0x50, 0x44, 0x46], "25504447"));
        assert!(magic_bytes_present(PDF, "25 50 44 46"));
    }

    #[test]
    fn test_magic_bytes_at_last_position() {
        assert!(magic_bytes_present(&[0x00, 0x01, 0x02], "02"));
        assert!(magic_bytes_present(&[0x00, 0x01, 0x02], "0102"));
    }

    #[test]
    fn test_magic_bytes_edge_cases() {
        assert!(!magic_bytes_present(PDF, ""));
        assert!(!magic_bytes_present(PDF, "   "));
        assert!(!magic_bytes_present(&[0x25], "2550"));
        assert!(!magic_bytes_present(PDF, "not-hex"));
        assert!(!magic_bytes_present(&[], "25"));
    }

    #[test]
    fn test_header() {
        assert!(header_matches(PDF, "25504446"));
        assert!(header_matches(PDF, ""));
        assert!(!header_matches(PDF, "504446"));
        assert!(!header_matches(&[0x25], "2550"));
    }

    #[test]
    fn test_footer() {
        // "%%EOF"
        assert!(footer_matches(PDF, "2525454f46"));
        assert!(footer_matches(PDF, ""));
        assert!(!footer_matches(PDF, "2525454f"));
        assert!(!footer_matches(b"EOF", "2525454f46"));
        assert!(footer_matches(b"%%EOF", "2525454f46"));
    }

    #[test]
    fn test_odd_length_pattern() {
        // "504" decodes to [0x05, 0x04]
        assert!(header_matches(&[0x05, 0x04, 0xFF], "504"));
    }
}
