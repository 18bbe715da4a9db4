//! Webhook delivery envelope.

use bytes::Bytes;
use std::collections::HashMap;

use super::SignatureScheme;

/// Event type header.
pub const EVENT_HEADER: &str = "x-github-event";
/// Delivery id header.
pub const DELIVERY_HEADER: &str = "x-github-delivery";
/// Current signature header (HMAC-SHA256).
pub const SIGNATURE_HEADER_SHA256: &str = "x-hub-signature-256";
/// Legacy signature header (HMAC-SHA1).
pub const SIGNATURE_HEADER_SHA1: &str = "x-hub-signature";

/// Raw webhook delivery as received over HTTP.
///
/// The body is kept as the exact bytes received; verification and JSON
/// parsing both read from it.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    body: Bytes,
    signature: Option<String>,
    scheme: SignatureScheme,
    event_type: Option<String>,
    delivery_id: Option<String>,
}

impl WebhookEnvelope {
    /// Build an envelope from lower-cased header names and the raw body.
    ///
    /// When both signature headers are present the SHA-256 one wins. When
    /// neither is present the scheme is SHA-256 and the signature is absent.
    pub fn from_headers(headers: &HashMap<String, String>, body: Bytes) -> Self {
        let non_empty = |name: &str| headers.get(name).filter(|v| !v.is_empty()).cloned();

        let (signature, scheme) = match non_empty(SIGNATURE_HEADER_SHA256) {
            Some(sig) => (Some(sig), SignatureScheme::Sha256),
            None => match non_empty(SIGNATURE_HEADER_SHA1) {
                Some(sig) => (Some(sig), SignatureScheme::Sha1),
                None => (None, SignatureScheme::Sha256),
            },
        };

        Self {
            body,
            signature,
            scheme,
            event_type: non_empty(EVENT_HEADER),
            delivery_id: non_empty(DELIVERY_HEADER),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn delivery_id(&self) -> Option<&str> {
        self.delivery_id.as_deref()
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
