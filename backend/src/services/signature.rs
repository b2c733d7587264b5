//! Webhook Signature Verification
//!
//! GitHub signs every delivery with HMAC-SHA256 over the raw request body
//! using the secret configured on the webhook, and sends the hex digest in
//! `X-Hub-Signature-256` as `sha256=<hex>`. Verification must run on the raw
//! bytes before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Prefix GitHub puts in front of the hex digest
const SIGNATURE_PREFIX: &str = "sha256=";

/// Length of a hex-encoded SHA-256 digest
const DIGEST_HEX_LEN: usize = 64;

/// Errors that can occur during signature validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing X-Hub-Signature-256 header")]
    MissingHeader,

    #[error("Invalid signature format: {0}")]
    MalformedHeader(String),

    #[error("Signatures do not match")]
    Mismatch,
}

/// Verifies `X-Hub-Signature-256` against a pre-shared secret
#[derive(Clone)]
pub struct WebhookSignatureVerifier {
    secret: Vec<u8>,
}

impl std::fmt::Debug for WebhookSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSignatureVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl WebhookSignatureVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    /// Validate the signature header for `body`.
    ///
    /// # Returns
    /// * `Ok(())` if the digest matches
    /// * `Err(SignatureError::MissingHeader)` / `MalformedHeader` when the header
    ///   is absent or lacks the `sha256=` prefix
    /// * `Err(SignatureError::Mismatch)` for any other digest that is not the
    ///   lowercase hex HMAC of `body`, whatever its length or alphabet
    pub fn verify(&self, header: Option<&str>, body: &[u8]) -> Result<(), SignatureError> {
        let header = header.ok_or(SignatureError::MissingHeader)?;
        let expected = parse_header(header)?;

        let mut mac = self.mac();
        mac.update(body);
        // verify_slice compares in constant time
        mac.verify_slice(&expected)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Compute the header value GitHub would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(body);
        format!(
            "{SIGNATURE_PREFIX}{}",
            hex::encode(mac.finalize().into_bytes())
        )
    }
}

fn parse_header(header: &str) -> Result<Vec<u8>, SignatureError> {
    let digest = header.strip_prefix(SIGNATURE_PREFIX).ok_or_else(|| {
        SignatureError::MalformedHeader(format!("expected {SIGNATURE_PREFIX} prefix"))
    })?;

    // GitHub always sends lowercase hex; anything else cannot match
    let lowercase_hex = digest
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if digest.len() != DIGEST_HEX_LEN || !lowercase_hex {
        return Err(SignatureError::Mismatch);
    }

    hex::decode(digest).map_err(|_| SignatureError::Mismatch)
}
