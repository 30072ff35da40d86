use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

/// Base64 (standard alphabet) SHA-256 digest of `content`.
pub fn sha256_base64(content: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(content))
}
