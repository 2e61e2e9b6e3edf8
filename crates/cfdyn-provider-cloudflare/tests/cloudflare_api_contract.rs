//! Contract Test: Cloudflare API v4 wire format
//!
//! Runs the provider against a local mock of the Cloudflare API.
//!
//! Constraints verified:
//! - Every request carries X-Auth-Email, X-Auth-Key and a JSON content type
//! - Record lookups filter by type and name in the query string
//! - Updates PUT `{type, name, content}` to the per-record URL
//! - `success: false` and HTTP errors surface as errors, not empty values

use cfdyn_core::config::CloudflareCredentials;
use cfdyn_core::http::HttpClient;
use cfdyn_core::model::{PublicIp, RecordType, RecordUpdate};
use cfdyn_core::traits::DnsProvider;
use cfdyn_core::Error;
use cfdyn_provider_cloudflare::CloudflareProvider;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> CloudflareProvider {
    let http = HttpClient::new(Duration::from_secs(5)).unwrap();
    CloudflareProvider::new(
        &CloudflareCredentials {
            email: "ops@example.com".to_string(),
            api_key: "global-key".to_string(),
        },
        server.uri(),
        http,
    )
    .unwrap()
}

#[tokio::test]
async fn list_zones_sends_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/"))
        .and(header("X-Auth-Email", "ops@example.com"))
        .and(header("X-Auth-Key", "global-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [
                { "id": "z0", "name": "example.org", "status": "active" },
                { "id": "z1", "name": "example.com", "status": "active" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let zones = assert_ok!(provider(&server).list_zones().await);

    assert_eq!(zones.len(), 2);
    assert_eq!(zones[1].id, "z1");
    assert_eq!(zones[1].name, "example.com");
}

#[tokio::test]
async fn list_records_filters_by_type_and_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/dns_records"))
        .and(query_param("type", "A"))
        .and(query_param("name", "home.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "id": "r1", "name": "home.example.com", "content": "1.2.3.4", "type": "A" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = assert_ok!(
        provider(&server)
            .list_records("z1", RecordType::A, "home.example.com")
            .await
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "r1");
    assert_eq!(records[0].content, "1.2.3.4");
}

#[tokio::test]
async fn update_record_puts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/zones/z1/dns_records/r1"))
        .and(header("X-Auth-Key", "global-key"))
        .and(body_json(json!({
            "type": "A",
            "name": "home.example.com",
            "content": "5.6.7.8"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": { "id": "r1", "content": "5.6.7.8" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ip = PublicIp::parse("5.6.7.8").unwrap();
    let update = RecordUpdate::a_record("home.example.com", &ip);
    let response = assert_ok!(provider(&server).update_record("z1", "r1", &update).await);

    assert!(response.success);
    assert!(response.errors.is_empty());
}

#[tokio::test]
async fn update_record_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 81057, "message": "Record already exists." }]
        })))
        .mount(&server)
        .await;

    let ip = PublicIp::parse("5.6.7.8").unwrap();
    let update = RecordUpdate::a_record("home.example.com", &ip);
    let response = assert_ok!(provider(&server).update_record("z1", "r1", &update).await);

    assert!(!response.success);
    assert_eq!(response.errors, vec!["81057: Record already exists.".to_string()]);
}

#[tokio::test]
async fn unsuccessful_list_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 6003, "message": "Invalid request headers" }],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).list_zones().await);

    assert!(
        err.to_string().contains("6003: Invalid request headers"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn forbidden_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 9103, "message": "Unknown X-Auth-Key or X-Auth-Email" }]
        })))
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).list_zones().await);

    match err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "cloudflare");
            assert!(message.starts_with("Authentication failed"));
            assert!(!message.contains("global-key"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream timeout"))
        .mount(&server)
        .await;

    let err = assert_err!(
        provider(&server)
            .list_records("z1", RecordType::A, "home.example.com")
            .await
    );

    assert!(matches!(err, Error::Decode { .. }), "unexpected error: {err}");
}
