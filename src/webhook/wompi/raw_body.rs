//! Raw request body capture for signed webhooks.
//!
//! The HMAC is computed over the exact text the provider sent, so the body must
//! be read before anything deserializes it. [`RawBody`] is an extractor that
//! consumes the payload itself; routes using it must not also take a JSON
//! extractor, otherwise the bytes are gone before the signature is checked.
//!
//! The capture never rejects a request. Bodies that are not JSON get an empty
//! object as parsed value, and a stream that ends abnormally is recorded as
//! incomplete so the validator can refuse it.

use ntex::{http::Payload, util::Bytes, web};
use serde_json::{Map, Value};

/// The body of a webhook request, both verbatim and parsed
#[derive(Debug, Clone, PartialEq)]
pub struct RawBody {
    raw: String,
    parsed: Value,
    complete: bool,
}

impl RawBody {
    /// Builds the capture from the bytes received, in arrival order
    pub fn capture(bytes: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(bytes).into_owned();
        let parsed = parse_or_empty(&raw);

        Self {
            raw,
            parsed,
            complete: true,
        }
    }

    /// Capture for a body stream that was aborted or could not be read
    pub fn incomplete() -> Self {
        Self {
            raw: String::new(),
            parsed: empty_object(),
            complete: false,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed body, `{}` when the raw text is not valid JSON.
    ///
    /// Note `{}` is also what an empty JSON object payload parses to.
    pub fn parsed(&self) -> &Value {
        &self.parsed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Best-effort JSON parse, never fails
pub fn parse_or_empty(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            logfire::debug!(
                "Webhook body is not valid JSON, using empty object: {error}",
                error = e.to_string()
            );
            empty_object()
        }
    }
}

impl<Err: web::ErrorRenderer> web::FromRequest<Err> for RawBody {
    type Error = web::Error;

    async fn from_request(
        req: &web::HttpRequest,
        payload: &mut Payload,
    ) -> Result<Self, Self::Error> {
        match <Bytes as web::FromRequest<Err>>::from_request(req, payload).await {
            Ok(bytes) => Ok(RawBody::capture(&bytes)),
            Err(e) => {
                logfire::warn!(
                    "Webhook body could not be read completely: {error}",
                    error = e.to_string()
                );
                Ok(RawBody::incomplete())
            }
        }
    }
}
