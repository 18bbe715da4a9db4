//! GitHub webhook intake and signature verification.
//!
//! # Core Components
//!
//! - [`WebhookEnvelope`] - raw body plus the delivery headers that matter
//! - [`SignatureScheme`] - HMAC-SHA256 (current) or HMAC-SHA1 (legacy)
//! - [`verify_signature`] - stateless constant-time verification
//! - [`SignatureVerifier`] - verification bound to the configured secret
//!
//! # Security
//!
//! Verification operates on the exact bytes received. Any malformed input
//! (missing header, wrong prefix, bad hex, missing secret) is a rejection,
//! never an error. Secrets and signature values are never logged.

pub mod envelope;
pub mod validation;

pub use envelope::{
    WebhookEnvelope, DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER_SHA1, SIGNATURE_HEADER_SHA256,
};
pub use validation::{verify_signature, SignatureScheme, SignatureVerifier};
