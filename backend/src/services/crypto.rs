//! Interaction signature verification
//!
//! Discord signs every request to the interactions endpoint with the
//! application's Ed25519 key over `timestamp || body`, sending the hex
//! signature in `X-Signature-Ed25519` and the timestamp in
//! `X-Signature-Timestamp`.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("Invalid public key format: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),

    #[error("Invalid request signature")]
    VerificationFailed,
}

/// Verifies interaction requests against the application public key
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    /// Parse the hex-encoded 32-byte public key shown in the developer portal.
    pub fn from_hex(public_key: &str) -> Result<Self, InteractionError> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| InteractionError::InvalidPublicKey(format!("Invalid hex: {e}")))?;

        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            InteractionError::InvalidPublicKey(format!("expected 32 bytes, got {}", b.len()))
        })?;

        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| InteractionError::InvalidPublicKey(format!("Invalid Ed25519 key: {e}")))?;

        Ok(Self { key })
    }

    pub fn verify(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> Result<(), InteractionError> {
        let signature = signature.ok_or(InteractionError::MissingHeader(SIGNATURE_HEADER))?;
        let timestamp = timestamp.ok_or(InteractionError::MissingHeader(TIMESTAMP_HEADER))?;

        let bytes = hex::decode(signature.trim())
            .map_err(|e| InteractionError::InvalidSignature(format!("Invalid hex: {e}")))?;
        let bytes: [u8; 64] = bytes.try_into().map_err(|b: Vec<u8>| {
            InteractionError::InvalidSignature(format!("expected 64 bytes, got {}", b.len()))
        })?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| InteractionError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        hex::encode(key.sign(&message).to_bytes())
    }

    fn verifier() -> InteractionVerifier {
        InteractionVerifier::from_hex(&hex::encode(signing_key().verifying_key().as_bytes()))
            .unwrap()
    }

    #[test]
    fn accepts_valid_signature() {
        let body = br#"{"type":1}"#;
        let sig = sign(&signing_key(), "1700000000", body);
        assert_eq!(verifier().verify(Some(&sig), Some("1700000000"), body), Ok(()));
    }

    #[test]
    fn rejects_tampered_body_or_timestamp() {
        let body = br#"{"type":1}"#;
        let sig = sign(&signing_key(), "1700000000", body);
        assert_eq!(
            verifier().verify(Some(&sig), Some("1700000000"), br#"{"type":2}"#),
            Err(InteractionError::VerificationFailed)
        );
        assert_eq!(
            verifier().verify(Some(&sig), Some("1700000001"), body),
            Err(InteractionError::VerificationFailed)
        );
    }

    #[test]
    fn rejects_missing_headers() {
        assert_eq!(
            verifier().verify(None, Some("1"), b"{}"),
            Err(InteractionError::MissingHeader(SIGNATURE_HEADER))
        );
        assert_eq!(
            verifier().verify(Some("00"), None, b"{}"),
            Err(InteractionError::MissingHeader(TIMESTAMP_HEADER))
        );
    }

    #[test]
    fn rejects_malformed_signature() {
        assert!(matches!(
            verifier().verify(Some("zz"), Some("1"), b"{}"),
            Err(InteractionError::InvalidSignature(_))
        ));
        assert!(matches!(
            verifier().verify(Some("abcd"), Some("1"), b"{}"),
            Err(InteractionError::InvalidSignature(_))
        ));
    }

    #[test]
    fn rejects_malformed_public_key() {
        assert!(matches!(
            InteractionVerifier::from_hex("not-hex"),
            Err(InteractionError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            InteractionVerifier::from_hex("abcd"),
            Err(InteractionError::InvalidPublicKey(_))
        ));
    }
}
