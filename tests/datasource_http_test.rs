//! Data source integration tests against a mock upstream
//!
//! Each test starts a `wiremock` server playing the session endpoint
//! (`/adminJwt`) and the data endpoint (`/get`), then drives the data source
//! through the production `reqwest` client.

mod common;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brics_datasource::datasource::{TIME_FIELD, VALUE_FIELD};
use brics_datasource::model::{HealthStatus, QueryRequest, Target, TimeRange};
use brics_datasource::{DataSource, DatasourceError};

const THREE_RECORDS: &str = r#"[
    {"date": "2024-01-01", "occurrences": 1},
    {"date": "2024-01-02", "occurrences": 2},
    {"date": "2024-01-03", "occurrences": 42}
]"#;

async fn mount_auth(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/adminJwt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_data(server: &MockServer, token: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(header("Cookie", format!("JSESSIONID={}", token).as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn datasource(server: &MockServer) -> DataSource {
    DataSource::from_config(&common::config_for(&server.uri())).expect("datasource")
}

#[tokio::test]
async fn test_query_scenario_single_target() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok1").await;
    mount_data(&server, "tok1", THREE_RECORDS).await;

    let request = QueryRequest::new(TimeRange::new(1000, 2000), vec![Target::new("A")]);
    let response = datasource(&server).query(&request).await.expect("query");

    assert_eq!(response.data.len(), 1);
    let frame = &response.data[0];
    assert_eq!(frame.ref_id, "A");
    assert_eq!(
        frame.field(TIME_FIELD).unwrap().as_time(),
        Some(&[1000, 2000][..])
    );
    assert_eq!(
        frame.field(VALUE_FIELD).unwrap().as_number(),
        Some(&[3.0, 42.0][..])
    );

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["data"][0]["refId"], "A");
    assert_eq!(json["data"][0]["fields"][0]["type"], "time");
    assert_eq!(json["data"][0]["fields"][1]["type"], "number");
}

#[tokio::test]
async fn test_query_multiple_targets_share_one_upstream_round() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok2").await;
    mount_data(&server, "tok2", THREE_RECORDS).await;

    let request = QueryRequest::new(
        TimeRange::new(10, 20),
        vec![Target::new("A"), Target::new("B"), Target::new("C")],
    );
    let response = datasource(&server).query(&request).await.expect("query");

    let ref_ids: Vec<_> = response.data.iter().map(|f| f.ref_id.as_str()).collect();
    assert_eq!(ref_ids, vec!["A", "B", "C"]);
    for frame in &response.data {
        assert_eq!(frame.field(TIME_FIELD).unwrap().as_time(), Some(&[10, 20][..]));
    }
}

#[tokio::test]
async fn test_query_with_two_records_fails_whole_request() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok1").await;
    mount_data(
        &server,
        "tok1",
        r#"[{"date": 0, "occurrences": 1}, {"date": 1, "occurrences": 2}]"#,
    )
    .await;

    let request = QueryRequest::new(TimeRange::new(1000, 2000), vec![Target::new("A")]);
    let err = datasource(&server).query(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DatasourceError>(),
        Some(DatasourceError::InsufficientRecords {
            required: 3,
            available: 2
        })
    ));
}

#[tokio::test]
async fn test_query_data_endpoint_error_status() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok1").await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let request = QueryRequest::new(TimeRange::new(1, 2), vec![Target::new("A")]);
    let err = datasource(&server).query(&request).await.unwrap_err();

    match err.downcast_ref::<DatasourceError>() {
        Some(DatasourceError::UpstreamStatus {
            endpoint,
            status,
            body,
        }) => {
            assert_eq!(endpoint, "/get");
            assert_eq!(*status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_query_malformed_records() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok1").await;
    mount_data(&server, "tok1", r#"[{"date": 0}, {"date": 1}, {"date": 2}]"#).await;

    let request = QueryRequest::new(TimeRange::new(1, 2), vec![Target::new("A")]);
    let err = datasource(&server).query(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DatasourceError>(),
        Some(DatasourceError::Decode(_))
    ));
}

#[tokio::test]
async fn test_health_check_ignores_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(header("mode", "no-cors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let result = datasource(&server).test_datasource().await.expect("health");
    assert_eq!(result.status, HealthStatus::Success);
    assert_eq!(result.message, "Success");
}

#[tokio::test]
async fn test_health_check_unreachable_upstream() {
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let ds = DataSource::from_config(&common::config_for(&uri)).expect("datasource");
    assert!(ds.test_datasource().await.is_err());
}
