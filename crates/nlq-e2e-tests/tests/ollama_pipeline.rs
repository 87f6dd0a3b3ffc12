//! E2E tests for the parse pipeline over `OllamaProvider` and a mock Ollama
//! HTTP server, including cancellation.

mod helpers;

use std::time::Duration;

use wiremock::ResponseTemplate;

use helpers::TestHarness;
use nlq_parser::{CancellableError, CancellableRequest, make_cancellable};
use nlq_protocol::{ParseErrorKind, SearchFilterValue};

/// Ollama JSON-mode output flows through to a validated result.
#[tokio::test]
async fn e2e_ollama_success() {
    let h = TestHarness::with_ollama(2).await;
    h.mount_chat(
        r#"{"searchFilter": {"Severity": "CRITICAL_VULNERABILITY_SEVERITY", "CVSS": ">7"}, "confidence": 0.9}"#,
    )
    .await;

    let result = h.parse("critical CVEs with CVSS above 7").await.unwrap();

    assert_eq!(
        result.search_filter["CVSS"],
        SearchFilterValue::Single(">7".into())
    );
    assert_eq!(result.confidence, 0.9);
    assert_eq!(h.server_requests().await, 1);
    assert_eq!(h.parser.provider_name(), "ollama");
}

/// The HTTP client timeout surfaces as a `timeout` parse error.
#[tokio::test]
async fn e2e_ollama_timeout() {
    let h = TestHarness::with_ollama(1).await;
    h.mount_slow_chat(r#"{"searchFilter": {}, "confidence": 0.9}"#, Duration::from_secs(5))
        .await;

    let err = h.parse("critical CVEs").await.unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::Timeout);
    assert!(err.message().contains("Request timeout after 1000ms"));
}

/// Server errors are API failures.
#[tokio::test]
async fn e2e_ollama_server_error() {
    let h = TestHarness::with_ollama(2).await;
    h.mount_chat_template(ResponseTemplate::new(500).set_body_string("model crashed"))
        .await;

    let err = h.parse("critical CVEs").await.unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::Api);
    assert!(err.message().contains("500"));
}

/// Model output that is not the expected shape is an API failure.
#[tokio::test]
async fn e2e_ollama_wrong_shape() {
    let h = TestHarness::with_ollama(2).await;
    h.mount_chat(r#"{"filter": {"Severity": "LOW"}, "score": 1}"#)
        .await;

    let err = h.parse("low CVEs").await.unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::Api);
    assert!(err.message().contains("searchFilter"));
}

/// Validation failures never reach the HTTP server.
#[tokio::test]
async fn e2e_ollama_not_called_for_invalid_input() {
    let h = TestHarness::with_ollama(2).await;
    h.mount_chat(r#"{"searchFilter": {}, "confidence": 0.9}"#)
        .await;

    let err = h.parse("   ").await.unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::Validation);
    assert_eq!(h.server_requests().await, 0);
}

/// Cancelling an in-flight request resolves it as cancelled.
#[tokio::test]
async fn e2e_cancel_in_flight_request() {
    let h = TestHarness::with_ollama(30).await;
    h.mount_slow_chat(r#"{"searchFilter": {}, "confidence": 0.9}"#, Duration::from_secs(10))
        .await;

    let parser = h.parser.clone();
    let filters = h.filters.clone();
    let CancellableRequest { request, cancel } = make_cancellable(move |_token| async move {
        parser
            .parse_natural_language_query("critical CVEs", &filters)
            .await
    });

    let handle = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    let started = std::time::Instant::now();
    let outcome = request.await;
    assert!(matches!(outcome, Err(CancellableError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(cancel.is_cancelled());
}

/// A request that settles first keeps its result; a late cancel is a no-op.
#[tokio::test]
async fn e2e_cancel_after_completion_is_noop() {
    let h = TestHarness::with_ollama(2).await;
    h.mount_chat(r#"{"searchFilter": {"Image": "nginx"}, "confidence": 0.8}"#)
        .await;

    let parser = h.parser.clone();
    let filters = h.filters.clone();
    let CancellableRequest { request, cancel } = make_cancellable(move |_token| async move {
        parser
            .parse_natural_language_query("nginx images", &filters)
            .await
    });

    let result = request.await.unwrap();
    cancel.cancel();
    assert_eq!(
        result.search_filter["Image"],
        SearchFilterValue::Single("nginx".into())
    );
}

/// Pipeline errors come through the cancellable wrapper unchanged.
#[tokio::test]
async fn e2e_cancellable_passes_parse_errors_through() {
    let h = TestHarness::with_ollama(2).await;
    h.mount_chat_template(ResponseTemplate::new(503)).await;

    let parser = h.parser.clone();
    let filters = h.filters.clone();
    let req = make_cancellable(move |_token| async move {
        parser
            .parse_natural_language_query("critical CVEs", &filters)
            .await
    });

    let err = req.request.await.unwrap_err().into_inner().unwrap();
    assert_eq!(err.kind(), ParseErrorKind::Api);
    assert_eq!(err.original_query(), "critical CVEs");
}
