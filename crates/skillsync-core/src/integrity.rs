//! Content digests for provenance and change detection.

use sha2::{Digest, Sha256};

/// Compute the algorithm-prefixed digest of skill content.
///
/// The `sha256:` prefix lets stored records survive a future algorithm
/// change without ambiguity.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
