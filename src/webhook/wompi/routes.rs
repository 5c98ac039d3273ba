//! Wompi webhook endpoint
//!
//! # Security
//!
//! Every delivery goes through [`RawBody`] capture and then the signature
//! verifier. Only authentic and fresh requests reach the payment
//! confirmation; rejections answer with 400/401/500 and an error body that
//! carries no internal detail.

use ntex::web;
use serde_json::json;
use tracing::Instrument;

use super::{errors::WebhookError, raw_body::RawBody, security::SignatureHeaders};
use crate::{api, webhook::AppState};

/// Webhook receiver endpoint (POST)
///
/// # Returns
/// - 200 `{"status": "received"}` when the event was confirmed
/// - 200 `{"status": "ignored"}` when the verified body is not a known event
/// - 400 missing headers, stale timestamp or timestamp mismatch
/// - 401 signature mismatch
/// - 500 malformed signature header, incomplete body or confirmation failure
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: RawBody,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let span = logfire::span!("wompi_webhook");

    span.in_scope(|| {
        app_state
            .verifier
            .verify(SignatureHeaders::from_header_map(req.headers()), &body)
    })?;

    let handled = api::payment::confirm_parsed_body(&app_state.payment_confirmation, body.parsed())
        .instrument(span)
        .await
        .map_err(|e| {
            WebhookError::InternalError(format!("payment confirmation failed: {e}"))
        })?;

    let status = if handled { "received" } else { "ignored" };

    Ok(web::HttpResponse::Ok().json(&json!({ "status": status })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::payment::{LoggedPaymentConfirmation, MockPaymentConfirmation},
        webhook::{routes, wompi::security::SignatureVerifier},
    };
    use ntex::{http::StatusCode, util::Bytes, web::test};

    const SECRET: &str = "prod_events_test_secret";

    fn now() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    fn event_body(reference: &str) -> String {
        format!(
            r#"{{"event":"transaction.updated","data":{{"transaction":{{"id":"tx-9","reference":"{reference}","amount_in_cents":990000,"currency":"COP","status":"APPROVED"}}}},"sent_at":"2024-01-01T00:00:00.000Z"}}"#
        )
    }

    fn app_state(confirmation: api::payment::ImplPaymentConfirmation) -> AppState {
        AppState {
            verifier: SignatureVerifier::new(SECRET),
            payment_confirmation: confirmation,
        }
    }

    async fn send(
        state: AppState,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &str,
    ) -> (StatusCode, Bytes) {
        let app = test::init_service(web::App::new().state(state).configure(routes::wompi)).await;

        let mut req = test::TestRequest::post().uri("/webhook/wompi");
        if let Some(signature) = signature {
            req = req.header("x-signature", signature);
        }
        if let Some(timestamp) = timestamp {
            req = req.header("x-timestamp", timestamp);
        }

        let resp = test::call_service(&app, req.set_payload(body.to_string()).to_request()).await;
        let status = resp.status();
        (status, test::read_body(resp).await)
    }

    fn json_body(bytes: &Bytes) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[ntex::test]
    async fn test_valid_delivery_is_confirmed() {
        let body = event_body("SPG-1001");
        let timestamp = now();
        let signature = SignatureVerifier::new(SECRET)
            .signature_header(&timestamp, &body)
            .unwrap();

        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm()
            .withf(|event| event.data.transaction.reference == "SPG-1001")
            .times(1)
            .returning(|_| Ok(()));

        let (status, resp) = send(
            app_state(Box::new(mock)),
            Some(&signature),
            Some(&timestamp),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&resp), json!({"status": "received"}));
    }

    #[ntex::test]
    async fn test_missing_headers_is_bad_request() {
        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm().times(0);

        let (status, resp) =
            send(app_state(Box::new(mock)), None, Some(&now()), "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&resp), json!({"error": "missing signature headers"}));
    }

    #[ntex::test]
    async fn test_stale_delivery_is_bad_request() {
        let body = event_body("SPG-1002");
        let timestamp = (chrono::Utc::now().timestamp() - 3600).to_string();
        let signature = SignatureVerifier::new(SECRET)
            .signature_header(&timestamp, &body)
            .unwrap();

        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm().times(0);

        let (status, resp) = send(
            app_state(Box::new(mock)),
            Some(&signature),
            Some(&timestamp),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&resp), json!({"error": "stale timestamp"}));
    }

    #[ntex::test]
    async fn test_body_over_payload_limit_is_server_error() {
        let body = event_body("SPG-1005");
        assert!(body.len() > 200);
        let timestamp = now();
        let signature = SignatureVerifier::new(SECRET)
            .signature_header(&timestamp, &body)
            .unwrap();

        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm().times(0);

        let app = test::init_service(
            web::App::new()
                .state(web::types::PayloadConfig::new(16))
                .state(app_state(Box::new(mock)))
                .configure(routes::wompi),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/webhook/wompi")
            .header("x-signature", signature.as_str())
            .header("x-timestamp", timestamp.as_str())
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(&test::read_body(resp).await),
            json!({"error": "internal error"})
        );
    }

    #[ntex::test]
    async fn test_wrong_secret_is_unauthorized() {
        let body = event_body("SPG-1003");
        let timestamp = now();
        let signature = SignatureVerifier::new("another-secret")
            .signature_header(&timestamp, &body)
            .unwrap();

        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm().times(0);

        let (status, resp) = send(
            app_state(Box::new(mock)),
            Some(&signature),
            Some(&timestamp),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let resp = String::from_utf8_lossy(&resp).to_string();
        assert!(!resp.contains(SECRET));
    }

    #[ntex::test]
    async fn test_signature_without_digest_is_server_error() {
        let timestamp = now();
        let signature = format!("t={timestamp}");

        let (status, resp) = send(
            app_state(Box::new(LoggedPaymentConfirmation)),
            Some(&signature),
            Some(&timestamp),
            "{}",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&resp), json!({"error": "internal error"}));
    }

    #[ntex::test]
    async fn test_verified_non_event_body_is_ignored() {
        let body = "not json";
        let timestamp = now();
        let signature = SignatureVerifier::new(SECRET)
            .signature_header(&timestamp, body)
            .unwrap();

        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm().times(0);

        let (status, resp) = send(
            app_state(Box::new(mock)),
            Some(&signature),
            Some(&timestamp),
            body,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&resp), json!({"status": "ignored"}));
    }

    #[ntex::test]
    async fn test_confirmation_failure_is_server_error() {
        let body = event_body("SPG-1004");
        let timestamp = now();
        let signature = SignatureVerifier::new(SECRET)
            .signature_header(&timestamp, &body)
            .unwrap();

        let mut mock = MockPaymentConfirmation::new();
        mock.expect_confirm()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("order store unavailable")));

        let (status, resp) = send(
            app_state(Box::new(mock)),
            Some(&signature),
            Some(&timestamp),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!String::from_utf8_lossy(&resp).contains("order store"));
    }
}
