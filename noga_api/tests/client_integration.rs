use chrono::NaiveDate;
use noga_api::{flatten, Client, DateRange, Error};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn range() -> DateRange {
    DateRange::single(NaiveDate::from_ymd_opt(2024, 5, 26).unwrap())
}

#[tokio::test]
async fn fetch_raw_posts_date_payload_and_decodes() {
    let server = MockServer::start().await;
    let body = load_fixture("production_mix.json");

    Mock::given(method("POST"))
        .and(path("/productionmix/PRODMIXAPI/v1"))
        .and(header("Ocp-Apim-Subscription-Key", "test-key"))
        .and(body_json(json!({
            "fromDate": "26-05-2024",
            "toDate": "26-05-2024"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&server)
        .await;

    let client = Client::new("test-key".to_string()).unwrap();
    let endpoint = format!("{}/productionmix/PRODMIXAPI/v1", server.uri());
    let raw = client.fetch_raw(&endpoint, &range()).await.unwrap();

    let keys = vec!["productionMixData".to_string(), "data".to_string()];
    let records = flatten(raw, &keys).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0].get("date").and_then(|v| v.as_str()),
        Some("26-05-2024")
    );
    assert_eq!(records[0].get("naturalGas"), Some(&json!(6120.4)));
}

#[tokio::test]
async fn demand_fixture_flattens_through_demand_wrapper() {
    let server = MockServer::start().await;
    let body = load_fixture("demand.json");

    Mock::given(method("POST"))
        .and(path("/DEMAND/DEMANDAPI/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&server)
        .await;

    let client = Client::new("test-key".to_string()).unwrap();
    let endpoint = format!("{}/DEMAND/DEMANDAPI/v1", server.uri());
    let raw = client.fetch_raw(&endpoint, &range()).await.unwrap();

    let keys = vec!["demandData".to_string(), "data".to_string()];
    let records = flatten(raw, &keys).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].get("demand"), Some(&json!(9150.7)));
}

#[tokio::test]
async fn non_success_status_is_an_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/DEMAND/DEMANDAPI/v1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("gateway unavailable"))
        .mount(&server)
        .await;

    let client = Client::new("test-key".to_string()).unwrap();
    let endpoint = format!("{}/DEMAND/DEMANDAPI/v1", server.uri());
    let err = client.fetch_raw(&endpoint, &range()).await.unwrap_err();

    match err {
        Error::Upstream { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("gateway unavailable"));
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_schema_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = Client::new("test-key".to_string()).unwrap();
    let err = client.fetch_raw(&server.uri(), &range()).await.unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let client = Client::new("test-key".to_string()).unwrap();
    let err = client
        .fetch_raw("http://127.0.0.1:9/DEMAND/DEMANDAPI/v1", &range())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn endpoint_scan_takes_first_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bad/v1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/good/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"demand": []})))
        .mount(&server)
        .await;

    let client = Client::new("test-key".to_string()).unwrap();
    let endpoints = vec![
        format!("{}/bad/v1", server.uri()),
        format!("{}/good/v1", server.uri()),
    ];
    let raw = client.fetch(&endpoints, &range()).await.unwrap();
    assert_eq!(raw, json!({"demand": []}));
}

#[tokio::test]
async fn endpoint_scan_exhaustion_keeps_every_cause() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Client::new("test-key".to_string()).unwrap();
    let endpoints = vec![
        format!("{}/a/v1", server.uri()),
        "http://127.0.0.1:9/b/v1".to_string(),
    ];
    let err = client.fetch(&endpoints, &range()).await.unwrap_err();

    match err {
        Error::Exhausted(causes) => {
            assert_eq!(causes.len(), 2);
            assert!(matches!(causes[0], Error::Upstream { status: 500, .. }));
            assert!(matches!(causes[1], Error::Transport { .. }));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}
