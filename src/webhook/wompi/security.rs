//! Signature verification for incoming Wompi webhook requests
//!
//! Every delivery carries two headers:
//!
//! - `x-timestamp`: unix seconds at which the provider signed the request
//! - `x-signature`: `t=<timestamp>,v1=<hex hmac-sha256>`
//!
//! The digest is HMAC-SHA256 keyed with the events secret over the string
//! `"<timestamp>.<raw body>"`. A request is authentic only when it passes, in
//! order: header presence, freshness, signature header parsing, timestamp
//! cross-check and digest comparison. The first failing gate decides the
//! rejection.
//!
//! # Important Notes
//!
//! - The digest MUST be computed over the raw body text, not re-serialized JSON
//! - Digest comparison is constant-time
//! - Requests replayed verbatim inside the freshness window are accepted again,
//!   there is no nonce tracking here

use std::fmt;

use hmac::{Hmac, Mac};
use ntex::http::HeaderMap;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{errors::WebhookError, raw_body::RawBody};
use crate::consts;

type HmacSha256 = Hmac<Sha256>;

/// Signature related headers of one delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureHeaders<'a> {
    pub signature: Option<&'a str>,
    pub timestamp: Option<&'a str>,
}

impl<'a> SignatureHeaders<'a> {
    pub fn new(signature: Option<&'a str>, timestamp: Option<&'a str>) -> Self {
        Self {
            signature,
            timestamp,
        }
    }

    /// Reads `x-signature` and `x-timestamp`, a value that is not visible
    /// ASCII counts as absent
    pub fn from_header_map(headers: &'a HeaderMap) -> Self {
        let read = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

        Self {
            signature: read(consts::SIGNATURE_HEADER),
            timestamp: read(consts::TIMESTAMP_HEADER),
        }
    }
}

/// Parsed `x-signature` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: String,
    pub digest: String,
}

impl SignatureHeader {
    /// Parses the `k=v,k=v` grammar of the signature header.
    ///
    /// Segments other than `t=` and `v1=` are ignored; when a key repeats the
    /// last one wins. Missing either key is a [`WebhookError::MalformedSignatureHeader`].
    pub fn parse(value: &str) -> Result<Self, WebhookError> {
        let mut timestamp = None;
        let mut digest = None;

        for segment in value.split(',') {
            let segment = segment.trim();
            if let Some(t) = segment.strip_prefix(consts::SIGNATURE_TIMESTAMP_PREFIX) {
                timestamp = Some(t);
            } else if let Some(v1) = segment.strip_prefix(consts::SIGNATURE_DIGEST_PREFIX) {
                digest = Some(v1);
            }
        }

        match (timestamp, digest) {
            (Some(timestamp), Some(digest)) => Ok(Self {
                timestamp: timestamp.to_string(),
                digest: digest.to_string(),
            }),
            _ => Err(WebhookError::MalformedSignatureHeader),
        }
    }
}

/// Validates webhook deliveries against a shared secret.
///
/// The verifier holds no per-request state and can be shared between workers.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
    tolerance_secs: u64,
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"[REDACTED]")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl SignatureVerifier {
    /// Verifier with the default five minutes freshness window
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_tolerance(secret, consts::DEFAULT_TOLERANCE_SECS)
    }

    pub fn with_tolerance(secret: impl Into<Vec<u8>>, tolerance_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    /// Lowercase hex HMAC-SHA256 of `"<timestamp>.<body>"`
    pub fn sign(&self, timestamp: &str, body: &str) -> Result<String, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| WebhookError::InternalError(format!("hmac init failed: {e}")))?;
        mac.update(signed_payload(timestamp, body).as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Value of the `x-signature` header for a body signed at `timestamp`
    pub fn signature_header(&self, timestamp: &str, body: &str) -> Result<String, WebhookError> {
        Ok(format!(
            "{}{timestamp},{}{digest}",
            consts::SIGNATURE_TIMESTAMP_PREFIX,
            consts::SIGNATURE_DIGEST_PREFIX,
            digest = self.sign(timestamp, body)?
        ))
    }

    /// Verifies a delivery against the current wall clock
    pub fn verify(&self, headers: SignatureHeaders<'_>, body: &RawBody) -> Result<(), WebhookError> {
        self.verify_at(headers, body, chrono::Utc::now().timestamp())
    }

    /// Verifies a delivery as if received at `now` (unix seconds)
    pub fn verify_at(
        &self,
        headers: SignatureHeaders<'_>,
        body: &RawBody,
        now: i64,
    ) -> Result<(), WebhookError> {
        let result = self.check(headers, body, now);

        match &result {
            Ok(()) => logfire::info!("Webhook signature verified"),
            Err(e) => {
                let outcome = e.outcome().to_string();
                let reason = e.to_string();
                logfire::warn!(
                    "Webhook rejected: {outcome} ({reason})",
                    outcome = outcome,
                    reason = reason
                );
            }
        }

        result
    }

    fn check(
        &self,
        headers: SignatureHeaders<'_>,
        body: &RawBody,
        now: i64,
    ) -> Result<(), WebhookError> {
        // 1. header presence
        let (signature, timestamp) = match (headers.signature, headers.timestamp) {
            (Some(s), Some(t)) if !s.trim().is_empty() && !t.trim().is_empty() => (s, t),
            _ => return Err(WebhookError::MissingHeaders),
        };

        // 2. freshness, inclusive bound
        let asserted: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::StaleTimestamp)?;
        if now.abs_diff(asserted) > self.tolerance_secs {
            return Err(WebhookError::StaleTimestamp);
        }

        // 3. signature header structure
        let parsed = SignatureHeader::parse(signature)?;

        // 4. the signed timestamp must be the one in x-timestamp, compared as text
        if parsed.timestamp != timestamp {
            return Err(WebhookError::TimestampMismatch);
        }

        if !body.is_complete() {
            return Err(WebhookError::InternalError(
                "request body was not received completely".into(),
            ));
        }
        if self.secret.is_empty() {
            return Err(WebhookError::InternalError(
                "webhook secret is not configured".into(),
            ));
        }

        // 5. digest
        let expected = self.sign(timestamp, body.raw())?;
        if !digests_match(&expected, &parsed.digest) {
            let preview: String = signed_payload(timestamp, body.raw())
                .chars()
                .take(consts::SIGNED_PAYLOAD_LOG_PREVIEW)
                .collect();
            logfire::debug!(
                "Webhook digest mismatch, signed string starts with: {preview}",
                preview = preview
            );
            return Err(WebhookError::BadSignature);
        }

        Ok(())
    }
}

fn signed_payload(timestamp: &str, body: &str) -> String {
    format!("{timestamp}.{body}")
}

/// Constant-time comparison of two hex digests.
///
/// The provided digest is lowercased first since hex is case-insensitive.
fn digests_match(expected: &str, provided: &str) -> bool {
    let provided = provided.to_ascii_lowercase();
    if expected.len() != provided.len() {
        return false;
    }

    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
