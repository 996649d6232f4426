//! Vendor-call normalization: every HTTP failure collapses into one
//! `ProviderFailure` carrying the vendor's message.

use medley::VendorClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn successful_calls_return_the_vendor_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/emotions"))
        .and(header("api-token", "k-123"))
        .and(body_json(json!({ "text": "fine" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "opinions": [{ "value": 0.4 }] }
        })))
        .mount(&server)
        .await;

    let client = VendorClient::new("acme");
    let payload = client
        .post_json(
            &format!("{}/v2/emotions", server.uri()),
            &[("api-token", "k-123")],
            &json!({ "text": "fine" }),
        )
        .await
        .unwrap();
    assert_eq!(payload["result"]["opinions"][0]["value"], json!(0.4));
}

#[tokio::test]
async fn non_2xx_replies_carry_the_vendor_message_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/emotions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "message": "quota exceeded" })),
        )
        .mount(&server)
        .await;

    let client = VendorClient::new("acme");
    let failure = client
        .post_json(&format!("{}/v2/emotions", server.uri()), &[], &json!({}))
        .await
        .unwrap_err();

    assert_eq!(failure.provider, "acme");
    assert_eq!(failure.status, Some(429));
    assert_eq!(failure.message, "quota exceeded");
}

#[tokio::test]
async fn error_bodies_without_conventional_fields_fall_back_to_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream maintenance"))
        .mount(&server)
        .await;

    let client = VendorClient::new("acme");
    let failure = client
        .get_json(&format!("{}/v2/status", server.uri()), &[])
        .await
        .unwrap_err();

    assert_eq!(failure.status, Some(503));
    assert_eq!(failure.message, "upstream maintenance");
}

#[tokio::test]
async fn undecodable_success_bodies_are_failures_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let client = VendorClient::new("acme");
    let failure = client
        .get_json(&format!("{}/v2/status", server.uri()), &[])
        .await
        .unwrap_err();

    assert_eq!(failure.status, Some(200));
    assert!(failure.message.contains("non-JSON"));
}

#[tokio::test]
async fn transport_failures_are_normalized_without_a_status() {
    // Nothing listens on this port.
    let client = VendorClient::new("acme");
    let failure = client
        .get_json("http://127.0.0.1:9/v2/status", &[])
        .await
        .unwrap_err();
    assert_eq!(failure.provider, "acme");
    assert_eq!(failure.status, None);
}
