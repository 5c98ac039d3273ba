use derive_more::{Display, Error};
use ntex::{http, web};
use serde_json::json;

/// Result of checking one webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VerificationOutcome {
    #[display("accepted")]
    Accepted,
    #[display("rejected_missing_headers")]
    RejectedMissingHeaders,
    #[display("rejected_stale_timestamp")]
    RejectedStaleTimestamp,
    #[display("rejected_timestamp_mismatch")]
    RejectedTimestampMismatch,
    #[display("rejected_bad_signature")]
    RejectedBadSignature,
    #[display("rejected_internal_error")]
    RejectedInternalError,
}

/// Reasons a webhook delivery is rejected before reaching the payment handler
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[display("missing x-signature or x-timestamp header")]
    MissingHeaders,
    #[display("timestamp outside the freshness window")]
    StaleTimestamp,
    #[display("signature timestamp does not match x-timestamp")]
    TimestampMismatch,
    #[display("signature digest mismatch")]
    BadSignature,
    #[display("malformed x-signature header")]
    MalformedSignatureHeader,
    #[display("internal error: {_0}")]
    InternalError(#[error(not(source))] String),
}

impl WebhookError {
    pub fn outcome(&self) -> VerificationOutcome {
        match self {
            WebhookError::MissingHeaders => VerificationOutcome::RejectedMissingHeaders,
            WebhookError::StaleTimestamp => VerificationOutcome::RejectedStaleTimestamp,
            WebhookError::TimestampMismatch => VerificationOutcome::RejectedTimestampMismatch,
            WebhookError::BadSignature => VerificationOutcome::RejectedBadSignature,
            WebhookError::MalformedSignatureHeader | WebhookError::InternalError(_) => {
                VerificationOutcome::RejectedInternalError
            }
        }
    }

    /// Message safe to send back to the caller
    fn public_message(&self) -> &'static str {
        match self {
            WebhookError::MissingHeaders => "missing signature headers",
            WebhookError::StaleTimestamp => "stale timestamp",
            WebhookError::TimestampMismatch => "timestamp mismatch",
            WebhookError::BadSignature => "invalid signature",
            WebhookError::MalformedSignatureHeader | WebhookError::InternalError(_) => {
                "internal error"
            }
        }
    }
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        web::HttpResponse::build(self.status_code()).json(&json!({
            "error": self.public_message()
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::MissingHeaders
            | WebhookError::StaleTimestamp
            | WebhookError::TimestampMismatch => http::StatusCode::BAD_REQUEST,
            WebhookError::BadSignature => http::StatusCode::UNAUTHORIZED,
            WebhookError::MalformedSignatureHeader | WebhookError::InternalError(_) => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
