mod common;

use common::{record_from, MockUpstream};
use recordcast::{ErrorExt, HttpRecordSource, RecordSource, SourceEndpoint, StatusCode, UpstreamError};

fn endpoint(
    upstream: &MockUpstream,
    name: &str,
    path: &str,
) -> SourceEndpoint {
    SourceEndpoint::resolve(name, &upstream.base_url(), path).unwrap()
}

#[tokio::test]
async fn test_fetch_parses_records() {
    let upstream = MockUpstream::start().await;
    let source = HttpRecordSource::new();

    let records = source
        .fetch_records(&endpoint(&upstream, "homicide", "/records/homicide"), 40.7, -74.0, 2.0)
        .await
        .unwrap();
    assert_eq!(records, vec![record_from("homicide")]);
}

/// Тест проверяет, что не-2xx статус становится `UpstreamError::Status` с
/// именем источника.
#[tokio::test]
async fn test_non_success_status_is_error() {
    let upstream = MockUpstream::start().await;
    let source = HttpRecordSource::new();

    let err = source
        .fetch_records(&endpoint(&upstream, "theft", "/status/503"), 0.0, 0.0, 1.0)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        UpstreamError::Status {
            name: "theft".to_string(),
            status: 503
        }
    );
    assert_eq!(err.source_name(), "theft");
    assert_eq!(err.status_code(), StatusCode::UpstreamStatus);
}

#[tokio::test]
async fn test_unparseable_body_is_decode_error() {
    let upstream = MockUpstream::start().await;
    let source = HttpRecordSource::new();

    let err = source
        .fetch_records(&endpoint(&upstream, "garbage", "/garbage"), 0.0, 0.0, 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Decode { ref name, .. } if name == "garbage"));
    assert_eq!(err.status_code(), StatusCode::UpstreamDecode);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = SourceEndpoint::resolve("theft", &format!("http://{addr}"), "/theft").unwrap();
    let err = HttpRecordSource::new()
        .fetch_records(&endpoint, 0.0, 0.0, 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Transport { .. }));
    assert!(err.status_code().is_retryable());
}
