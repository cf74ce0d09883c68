//! Encrypted-hash payload value object.
//!
//! The payload is never persisted; it exists only inside the ciphertext
//! of an encrypted share hash.

use uuid::Uuid;

use murmur_core::error::AppError;
use murmur_core::result::AppResult;

use super::model::ResourceType;

/// Outward message for every payload decode failure. The codec relies on
/// this being a single fixed string so that malformed, tampered, and
/// semantically invalid hashes are indistinguishable to callers.
pub const INVALID_HASH_MSG: &str = "Invalid or expired share link";

/// The plaintext carried inside an encrypted share hash.
///
/// Serialized as `type:id:timestamp:nonce`. The nonce only makes
/// repeated shares of the same resource produce different ciphertexts;
/// it carries no meaning on resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    /// Kind of resource the hash points at.
    pub resource_type: ResourceType,
    /// The resource's ID.
    pub resource_id: Uuid,
    /// Issuance time, milliseconds since the Unix epoch.
    pub issued_at_millis: i64,
    /// Random alphanumeric salt.
    pub nonce: String,
}

impl SharePayload {
    /// Render the delimiter-separated plaintext form.
    pub fn to_plaintext(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.resource_type, self.resource_id, self.issued_at_millis, self.nonce
        )
    }

    /// Parse the plaintext form back into a payload.
    ///
    /// The field count is strict: anything but exactly four
    /// colon-separated fields, an unknown resource type, a non-UUID id,
    /// or a non-numeric timestamp fails — uniformly.
    pub fn parse(plaintext: &str) -> AppResult<Self> {
        let parts: Vec<&str> = plaintext.split(':').collect();
        let [kind, id, millis, nonce] = parts.as_slice() else {
            return Err(AppError::decode_failure(INVALID_HASH_MSG));
        };

        let resource_type = kind
            .parse::<ResourceType>()
            .map_err(|_| AppError::decode_failure(INVALID_HASH_MSG))?;
        let resource_id = id
            .parse::<Uuid>()
            .map_err(|_| AppError::decode_failure(INVALID_HASH_MSG))?;
        let issued_at_millis = millis
            .parse::<i64>()
            .map_err(|_| AppError::decode_failure(INVALID_HASH_MSG))?;
        if nonce.is_empty() {
            return Err(AppError::decode_failure(INVALID_HASH_MSG));
        }

        Ok(Self {
            resource_type,
            resource_id,
            issued_at_millis,
            nonce: (*nonce).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::error::ErrorKind;

    #[test]
    fn test_plaintext_round_trip() {
        let payload = SharePayload {
            resource_type: ResourceType::Post,
            resource_id: Uuid::new_v4(),
            issued_at_millis: 1_700_000_000_123,
            nonce: "a1b2c3d4e5".to_string(),
        };
        let parsed = SharePayload::parse(&payload.to_plaintext()).expect("parse");
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        let id = Uuid::new_v4();
        assert!(SharePayload::parse(&format!("post:{id}:123")).is_err());
        assert!(SharePayload::parse(&format!("post:{id}:123:n:extra")).is_err());
        assert!(SharePayload::parse("").is_err());
    }

    #[test]
    fn test_unknown_resource_type_is_decode_failure() {
        let id = Uuid::new_v4();
        let err = SharePayload::parse(&format!("folder:{id}:123:nonce")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DecodeFailure);
        assert_eq!(err.message, INVALID_HASH_MSG);
    }

    #[test]
    fn test_rejects_bad_id_and_timestamp() {
        let id = Uuid::new_v4();
        assert!(SharePayload::parse("post:not-a-uuid:123:nonce").is_err());
        assert!(SharePayload::parse(&format!("post:{id}:soon:nonce")).is_err());
        assert!(SharePayload::parse(&format!("post:{id}:123:")).is_err());
    }
}
