//! Webhook signature validation implementation.
//!
//! Provides HMAC-SHA256 and legacy HMAC-SHA1 signature validation for GitHub
//! webhooks using constant-time comparison to prevent timing attacks.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroizing;

use super::WebhookEnvelope;

/// HMAC scheme used to sign a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// `X-Hub-Signature-256: sha256=<hex>`
    Sha256,
    /// `X-Hub-Signature: sha1=<hex>` (legacy)
    Sha1,
}

impl SignatureScheme {
    /// Header value prefix for this scheme.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256=",
            Self::Sha1 => "sha1=",
        }
    }

    /// Digest length in bytes. Public, so comparing lengths leaks nothing.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha1 => 20,
        }
    }
}

impl std::fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha1 => write!(f, "sha1"),
        }
    }
}

/// Verify a webhook signature header against the raw payload.
///
/// Returns `false` when the header or secret is absent or empty, when the
/// header lacks the scheme prefix or is not valid hex, or when the digest does
/// not match. Never panics.
///
/// # Examples
///
/// ```
/// use slashbot_github::webhook::{verify_signature, SignatureScheme};
///
/// let payload = b"{}";
/// assert!(!verify_signature(payload, None, Some("secret"), SignatureScheme::Sha256));
/// assert!(!verify_signature(payload, Some("sha256=00"), None, SignatureScheme::Sha256));
/// ```
pub fn verify_signature(
    payload: &[u8],
    header_value: Option<&str>,
    secret: Option<&str>,
    scheme: SignatureScheme,
) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return false;
    };
    let Some(header_value) = header_value.filter(|h| !h.is_empty()) else {
        return false;
    };
    let Some(provided) = parse_signature(header_value, scheme) else {
        return false;
    };
    let Some(expected) = compute_hmac(payload, secret, scheme) else {
        return false;
    };

    // GitHub sends lower-case hex; any other spelling is a mismatch.
    constant_time_compare(provided.as_bytes(), hex::encode(expected).as_bytes())
}

/// Extract the hex digest from a `<scheme>=<hex>` header value.
fn parse_signature(signature: &str, scheme: SignatureScheme) -> Option<&str> {
    signature
        .strip_prefix(scheme.prefix())
        .filter(|hex_signature| hex_signature.len() == scheme.digest_len() * 2)
}

/// Compute the HMAC of the payload with the scheme's digest.
fn compute_hmac(payload: &[u8], secret: &str, scheme: SignatureScheme) -> Option<Vec<u8>> {
    match scheme {
        SignatureScheme::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
            mac.update(payload);
            Some(mac.finalize().into_bytes().to_vec())
        }
        SignatureScheme::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).ok()?;
            mac.update(payload);
            Some(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// Constant-time comparison of signatures.
///
/// The only early exit is on a length mismatch.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

/// Validates webhook deliveries against the configured webhook secret.
///
/// Cheap to clone. A verifier without a secret rejects everything.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<Zeroizing<String>>,
}

impl SignatureVerifier {
    /// Create a verifier. Empty secrets are treated as absent.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Zeroizing::new),
        }
    }

    /// Whether a webhook secret is available at all.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Verify an envelope using the scheme derived from its headers.
    pub fn verify(&self, envelope: &WebhookEnvelope) -> bool {
        let valid = verify_signature(
            envelope.body(),
            envelope.signature(),
            self.secret.as_ref().map(|s| s.as_str()),
            envelope.scheme(),
        );

        if !valid {
            warn!(
                scheme = %envelope.scheme(),
                delivery_id = envelope.delivery_id().unwrap_or("unknown"),
                signature_present = envelope.signature().is_some(),
                "Webhook signature verification failed"
            );
        }

        valid
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
