//! Encrypted share hash codec.
//!
//! A hash is the AES-256-GCM ciphertext of a [`SharePayload`], re-encoded
//! into a URL-safe alphabet. No server-side record exists for it;
//! validity is defined entirely by successful decryption and a
//! well-formed payload. The cipher key is process-wide, injected at
//! construction, and read-only afterwards.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use murmur_core::error::AppError;
use murmur_core::result::AppResult;
use murmur_entity::share::payload::INVALID_HASH_MSG;
use murmur_entity::share::{ResourceType, SharePayload};

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;
/// Length of the random payload salt.
const PAYLOAD_NONCE_LEN: usize = 10;

/// Issues and resolves self-contained encrypted share hashes.
///
/// The codec is a pure transform: it knows nothing about resources or
/// ownership. Authorization for issuance belongs to the caller.
#[derive(Clone)]
pub struct HashCodec {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for HashCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashCodec").finish_non_exhaustive()
    }
}

impl HashCodec {
    /// Creates a codec from the configured secret string. The 256-bit
    /// cipher key is the SHA-256 digest of the secret.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        Self::from_key_bytes(digest.into())
    }

    /// Creates a codec from raw key bytes.
    pub fn from_key_bytes(key: [u8; 32]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(&key);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Issues a hash for the given resource.
    ///
    /// The embedded salt makes repeated shares of the same resource
    /// produce different ciphertexts even before the random IV does.
    pub fn issue(&self, resource_type: ResourceType, resource_id: Uuid) -> AppResult<String> {
        let payload = SharePayload {
            resource_type,
            resource_id,
            issued_at_millis: Utc::now().timestamp_millis(),
            nonce: payload_nonce(),
        };
        self.encrypt(payload.to_plaintext().as_bytes())
    }

    /// Resolves a hash back into its payload.
    ///
    /// Malformed transport encoding, failed authentication, and invalid
    /// payload content all produce the same failure.
    pub fn resolve(&self, hash: &str) -> AppResult<SharePayload> {
        let plaintext = self.decrypt(hash)?;
        SharePayload::parse(&plaintext)
    }

    fn encrypt(&self, plaintext: &[u8]) -> AppResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| AppError::internal("Failed to encrypt share payload"))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(to_url_safe(&BASE64.encode(combined)))
    }

    fn decrypt(&self, hash: &str) -> AppResult<String> {
        let combined = BASE64
            .decode(from_url_safe(hash))
            .map_err(|_| AppError::decode_failure(INVALID_HASH_MSG))?;

        if combined.len() <= NONCE_LEN {
            return Err(AppError::decode_failure(INVALID_HASH_MSG));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| AppError::decode_failure(INVALID_HASH_MSG))?;

        String::from_utf8(plaintext).map_err(|_| AppError::decode_failure(INVALID_HASH_MSG))
    }
}

/// Substitute the three reserved characters of standard base64 and strip
/// padding.
fn to_url_safe(encoded: &str) -> String {
    encoded.replace('+', "-").replace('/', "_").replace('=', "")
}

/// Invert the substitution and restore padding.
fn from_url_safe(hash: &str) -> String {
    let mut restored = hash.replace('-', "+").replace('_', "/");
    while restored.len() % 4 != 0 {
        restored.push('=');
    }
    restored
}

/// Short random alphanumeric salt embedded in the payload.
fn payload_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PAYLOAD_NONCE_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::error::ErrorKind;

    fn codec() -> HashCodec {
        HashCodec::new("unit-test-secret")
    }

    #[test]
    fn test_round_trip_recovers_resource() {
        let codec = codec();
        let id = Uuid::new_v4();

        for kind in [ResourceType::Post, ResourceType::User] {
            let hash = codec.issue(kind, id).expect("issue");
            let payload = codec.resolve(&hash).expect("resolve");
            assert_eq!(payload.resource_type, kind);
            assert_eq!(payload.resource_id, id);
            assert_eq!(payload.nonce.len(), PAYLOAD_NONCE_LEN);
        }
    }

    #[test]
    fn test_hash_is_url_safe() {
        let codec = codec();
        for _ in 0..50 {
            let hash = codec.issue(ResourceType::Post, Uuid::new_v4()).expect("issue");
            assert!(!hash.contains('+'));
            assert!(!hash.contains('/'));
            assert!(!hash.contains('='));
        }
    }

    #[test]
    fn test_repeated_shares_differ() {
        let codec = codec();
        let id = Uuid::new_v4();
        let a = codec.issue(ResourceType::Post, id).expect("issue");
        let b = codec.issue(ResourceType::Post, id).expect("issue");
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_character_tamper_fails() {
        let codec = codec();
        let hash = codec.issue(ResourceType::Post, Uuid::new_v4()).expect("issue");

        for pos in 0..hash.len() {
            let mut tampered: Vec<char> = hash.chars().collect();
            tampered[pos] = if tampered[pos] == 'A' { 'B' } else { 'A' };
            let tampered: String = tampered.into_iter().collect();
            if tampered == hash {
                continue;
            }
            let err = codec.resolve(&tampered).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DecodeFailure);
            assert_eq!(err.message, INVALID_HASH_MSG);
        }
    }

    #[test]
    fn test_wrong_key_context_fails() {
        let issuing = HashCodec::from_key_bytes([7u8; 32]);
        let resolving = HashCodec::from_key_bytes([9u8; 32]);

        let hash = issuing.issue(ResourceType::User, Uuid::new_v4()).expect("issue");
        assert!(issuing.resolve(&hash).is_ok());
        let err = resolving.resolve(&hash).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_garbage_inputs_fail_uniformly() {
        let codec = codec();
        let short = "A".repeat(11);
        let long = "A".repeat(400);
        for input in ["", "!!!", "abc", short.as_str(), long.as_str()] {
            let err = codec.resolve(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DecodeFailure);
            assert_eq!(err.message, INVALID_HASH_MSG);
        }
    }
}
