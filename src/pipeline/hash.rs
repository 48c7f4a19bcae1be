//! Content hashes for cache-busting file names

use sha2::{Digest, Sha256};

/// Hex digits kept from the digest
pub const HASH_LENGTH: usize = 20;

/// First [`HASH_LENGTH`] hex characters of the SHA-256 of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = format!("{:x}", digest);
    hex.truncate(HASH_LENGTH);
    hex
}

/// Apply the `[name]-[hash].[ext]` pattern to a file name
///
/// Query strings are dropped; names without an extension become
/// `[name]-[hash]`.
pub fn hashed_name(file_name: &str, hash: &str) -> String {
    let file_name = file_name.split('?').next().unwrap_or(file_name);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, hash, ext),
        _ => format!("{}-{}", file_name, hash),
    }
}
