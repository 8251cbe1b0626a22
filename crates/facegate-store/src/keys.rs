//! Gallery key material: derivation from configuration, fresh generation.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// AES-256 key size in bytes.
pub const KEY_LEN: usize = 32;

/// Placeholder shipped in sample configuration; treated as "no key set".
pub const PLACEHOLDER_KEY: &str = "your-32-character-encryption-key-here";

/// 256-bit symmetric key protecting gallery records at rest.
#[derive(Clone)]
pub struct GalleryKey([u8; KEY_LEN]);

impl GalleryKey {
    /// Derive a key from an operator-supplied secret string.
    ///
    /// SHA-256 maps arbitrary-length configuration values onto the fixed
    /// AES-256 key size; the same `ENCRYPTION_KEY` always yields the same
    /// key, so records stay readable across restarts.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&digest);
        Self(key)
    }

    /// Generate a fresh random key.
    ///
    /// Returns the key and the hex string the operator must persist as
    /// `ENCRYPTION_KEY`; feeding that string back through
    /// [`from_secret`](Self::from_secret) reproduces this key. A generated
    /// key that is never persisted orphans every record written under it.
    pub fn generate() -> (Self, String) {
        let mut raw = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut raw);
        let hex: String = raw.iter().map(|b| format!("{b:02x}")).collect();
        (Self::from_secret(&hex), hex)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for GalleryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key bytes never reach logs.
        f.write_str("GalleryKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secret_is_deterministic() {
        let a = GalleryKey::from_secret("correct horse battery staple");
        let b = GalleryKey::from_secret("correct horse battery staple");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_different_secrets_differ() {
        let a = GalleryKey::from_secret("secret-one");
        let b = GalleryKey::from_secret("secret-two");
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_generated_key_reproducible_from_printed_hex() {
        let (key, hex) = GalleryKey::generate();
        assert_eq!(hex.len(), KEY_LEN * 2);
        let rederived = GalleryKey::from_secret(&hex);
        assert_eq!(key.as_bytes(), rederived.as_bytes());
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let (a, _) = GalleryKey::generate();
        let (b, _) = GalleryKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_debug_redacts_key_bytes() {
        let (key, hex) = GalleryKey::generate();
        let printed = format!("{key:?}");
        assert_eq!(printed, "GalleryKey(..)");
        assert!(!printed.contains(&hex[..8]));
    }
}
