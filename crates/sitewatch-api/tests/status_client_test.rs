#![allow(clippy::unwrap_used)]
// Integration tests for `StatusClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitewatch_api::transport::TransportConfig;
use sitewatch_api::{Error, LooseValue, StatusClient};

const STATUS_PATH: &str = "/api/Sites/SiteIPStatus";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, StatusClient) {
    let server = MockServer::start().await;
    let endpoint = Url::parse(&format!("{}{STATUS_PATH}", server.uri())).unwrap();
    let client = StatusClient::new(endpoint, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_site_status() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "site_name": "Andheri East",
            "site_code": "MUM-014",
            "gateway_type": "Fiber",
            "aggregator_ip": "10.14.0.1",
            "aggregator_status": 1,
            "aggregator_pinged_on": "2024-06-15T10:30:00",
            "cabina_controller_ip": "10.14.0.2",
            "cabina_controller_status": 0,
            "cabina_pinged_on": "2024-06-15T10:30:00",
            "cabinb_controller_ip": null,
            "cabinb_controller_status": null,
            "cabinb_pinged_on": null,
            "router_ip": "10.14.0.254",
            "router_status": true,
            "router_pinged_on": "2024-06-15T10:29:58",
            "poc3_ip": "",
            "poc3_status": null,
            "poc3_pinged_on": null,
            "aggregator_alive_status": " TRUE ",
            "aggregator_hash_key": "9f2c1a",
            "aggregator_alive_last_received_on": "2024-06-15T10:30:05",
            "aggregator_device_id": 4412
        },
        {
            "site_name": "Baner",
            "site_code": "PUN-002",
            "gateway_type": "4G"
        }
    ]);

    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let records = client.fetch_site_status().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].site_code, "MUM-014");
    assert_eq!(records[0].aggregator_status, Some(LooseValue::Int(1)));
    assert_eq!(records[0].router_status, Some(LooseValue::Bool(true)));
    assert_eq!(records[0].cabinb_controller_ip, None);
    assert_eq!(records[0].poc3_ip.as_deref(), Some(""));
    assert_eq!(records[0].aggregator_device_id, Some(LooseValue::Int(4412)));
    assert_eq!(records[1].gateway_type, "4G");
    assert_eq!(records[1].aggregator_alive_status, None);
}

#[tokio::test]
async fn test_fetch_empty_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let records = client.fetch_site_status().await.unwrap();
    assert!(records.is_empty());
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.fetch_site_status().await;

    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_site_status().await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let endpoint = Url::parse("http://127.0.0.1:1/api/Sites/SiteIPStatus").unwrap();
    let client = StatusClient::new(endpoint, &TransportConfig::default()).unwrap();

    let result = client.fetch_site_status().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_slow_endpoint_reports_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let endpoint = Url::parse(&format!("{}{STATUS_PATH}", server.uri())).unwrap();
    let transport = TransportConfig {
        timeout: std::time::Duration::from_secs(1),
        ..TransportConfig::default()
    };
    let client = StatusClient::new(endpoint, &transport).unwrap();

    let err = client.fetch_site_status().await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout_secs: 1 }),
        "expected Timeout error, got: {err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 1s");
}
