// src/services/credentials.rs
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Minimum length, in bytes, of the configured master key
pub const MIN_KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Encryption key not configured")]
    KeyNotConfigured,

    #[error("Encryption key must be at least {MIN_KEY_LEN} bytes")]
    KeyTooShort,

    #[error("Secret must not be empty")]
    EmptySecret,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid encrypted data format")]
    InvalidDataFormat,
}

/// Turns user secrets into their at-rest form and back
///
/// The at-rest form is `base64(nonce || AES-256-GCM ciphertext)`. The AES key
/// is the SHA-256 digest of the configured master key, so any master key of
/// at least [`MIN_KEY_LEN`] bytes yields a full-strength cipher key.
pub struct CredentialService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("cipher", &"<encrypted>")
            .finish()
    }
}

impl CredentialService {
    /// Build the service from the configured master key
    pub fn from_key(key_str: &str) -> Result<Self, CredentialError> {
        if key_str.is_empty() {
            return Err(CredentialError::KeyNotConfigured);
        }
        if key_str.len() < MIN_KEY_LEN {
            return Err(CredentialError::KeyTooShort);
        }

        let digest = Sha256::digest(key_str.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&digest).map_err(|_| CredentialError::KeyTooShort)?;

        Ok(Self { cipher })
    }

    /// Generate a new random master key (base64 of 32 random bytes)
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    /// Encrypt a plaintext secret and return its base64-encoded at-rest form
    #[allow(deprecated)]
    pub fn protect(&self, plaintext: &str) -> Result<String, CredentialError> {
        if plaintext.is_empty() {
            return Err(CredentialError::EmptySecret);
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CredentialError::EncryptionFailed(e.to_string()))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypt an at-rest secret back to plaintext
    #[allow(deprecated)]
    pub fn reveal(&self, encoded: &str) -> Result<String, CredentialError> {
        let combined = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| CredentialError::InvalidDataFormat)?;

        if combined.len() < NONCE_LEN {
            return Err(CredentialError::InvalidDataFormat);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CredentialError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(plaintext_bytes)
            .map_err(|_| CredentialError::DecryptionFailed("invalid UTF-8".to_string()))
    }

    /// Check a candidate secret against a stored at-rest secret
    pub fn matches(&self, candidate: &str, encoded: &str) -> Result<bool, CredentialError> {
        let stored = self.reveal(encoded)?;
        Ok(constant_time_eq(stored.as_bytes(), candidate.as_bytes()))
    }
}

// Length is not hidden; content comparison does not short-circuit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "my-secret-foobarbaz200030004000x";

    #[test]
    fn test_generate_key() {
        let key = CredentialService::generate_key();
        assert!(key.len() >= MIN_KEY_LEN);

        // A generated key is directly usable as a master key
        let service = CredentialService::from_key(&key);
        assert!(service.is_ok());
    }

    #[test]
    fn test_protect_reveal_round_trip() {
        let service = CredentialService::from_key(KEY).unwrap();

        for plaintext in ["hunter2", "x", "pässwörd with spaces", &"long".repeat(500)] {
            let protected = service.protect(plaintext).unwrap();
            assert_ne!(protected, plaintext);
            assert_eq!(service.reveal(&protected).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_protect_produces_different_ciphertext() {
        let service = CredentialService::from_key(KEY).unwrap();

        let first = service.protect("test_data").unwrap();
        let second = service.protect("test_data").unwrap();

        // Random nonce per call
        assert_ne!(first, second);
        assert_eq!(service.reveal(&first).unwrap(), "test_data");
        assert_eq!(service.reveal(&second).unwrap(), "test_data");
    }

    #[test]
    fn test_short_key_rejected_at_construction() {
        assert!(matches!(
            CredentialService::from_key("short-key"),
            Err(CredentialError::KeyTooShort)
        ));
        assert!(matches!(
            CredentialService::from_key(&KEY[..MIN_KEY_LEN - 1]),
            Err(CredentialError::KeyTooShort)
        ));
        assert!(matches!(
            CredentialService::from_key(""),
            Err(CredentialError::KeyNotConfigured)
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let service = CredentialService::from_key(KEY).unwrap();
        assert!(matches!(
            service.protect(""),
            Err(CredentialError::EmptySecret)
        ));
    }

    #[test]
    fn test_reveal_invalid_data() {
        let service = CredentialService::from_key(KEY).unwrap();

        assert!(matches!(
            service.reveal("not base64 at all!"),
            Err(CredentialError::InvalidDataFormat)
        ));
        assert!(matches!(
            service.reveal(&BASE64.encode([1u8, 2, 3])),
            Err(CredentialError::InvalidDataFormat)
        ));
    }

    #[test]
    fn test_reveal_with_other_key_fails() {
        let service = CredentialService::from_key(KEY).unwrap();
        let other = CredentialService::from_key("another-secret-key-0123456789abcdef").unwrap();

        let protected = service.protect("hunter2").unwrap();
        assert!(matches!(
            other.reveal(&protected),
            Err(CredentialError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_matches() {
        let service = CredentialService::from_key(KEY).unwrap();
        let protected = service.protect("hunter2").unwrap();

        assert!(service.matches("hunter2", &protected).unwrap());
        assert!(!service.matches("hunter3", &protected).unwrap());
        assert!(!service.matches("hunter", &protected).unwrap());
        assert!(service.matches("hunter2", "garbage").is_err());
    }
}
