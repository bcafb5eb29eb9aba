//! End-to-end run lifecycle: dispatch, settle, re-run

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scandeck::app::{App, AppEvent, Config};
use scandeck::scan::{RunStatus, ScanKind, RUNNING_MESSAGE, SUCCESS_MESSAGE};

async fn app_for(server: &MockServer) -> App {
    let mut config = Config::default();
    config.backend.base_url = server.uri();
    let mut app = App::new(config).unwrap();
    app.state.write().domain.value = "example.com".to_string();
    app
}

/// Drive one settlement through the event channel
async fn settle_next(app: &mut App) {
    let event = app.recv_event().await.expect("event channel closed");
    assert!(matches!(event, AppEvent::ScanSettled { .. }));
    app.handle_event(event).await.unwrap();
}

#[tokio::test]
async fn test_run_settles_into_success_with_payload() {
    let server = MockServer::start().await;
    let payload = json!([{"host": "a.example.com"}, {"host": "b.example.com"}]);

    Mock::given(method("POST"))
        .and(path("/scan/subdomain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let mut app = app_for(&server).await;
    app.start_scan(ScanKind::Subdomain);

    // Pending before the settlement is applied
    {
        let state = app.state.read();
        let result = state.board.result(ScanKind::Subdomain).unwrap();
        assert_eq!(result.status, RunStatus::Pending);
        assert_eq!(result.message, RUNNING_MESSAGE);
    }

    settle_next(&mut app).await;

    let state = app.state.read();
    let result = state.board.result(ScanKind::Subdomain).unwrap();
    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.message, SUCCESS_MESSAGE);
    assert_eq!(result.payload.as_ref().unwrap().raw, payload);
    assert!(!state.board.is_in_flight(ScanKind::Subdomain));
}

#[tokio::test]
async fn test_run_settles_into_error_from_backend_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan/api"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "tool not found"})))
        .mount(&server)
        .await;

    let mut app = app_for(&server).await;
    app.start_scan(ScanKind::Api);
    settle_next(&mut app).await;

    let state = app.state.read();
    let result = state.board.result(ScanKind::Api).unwrap();
    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.message, "tool not found");
    assert!(result.payload.is_none());
}

#[tokio::test]
async fn test_rerun_discards_first_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"url": "first"}])))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server).await;
    app.start_scan(ScanKind::Files);
    settle_next(&mut app).await;

    // Second run against a changed backend response
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/scan/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"url": "second"}])))
        .mount(&server)
        .await;

    app.start_scan(ScanKind::Files);
    settle_next(&mut app).await;

    let state = app.state.read();
    let result = state.board.result(ScanKind::Files).unwrap();
    assert_eq!(result.payload.as_ref().unwrap().raw, json!([{"url": "second"}]));
}

#[tokio::test]
async fn test_two_kinds_in_flight_at_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan/subdomain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/scan/webapp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut app = app_for(&server).await;
    app.start_scan(ScanKind::Subdomain);
    app.start_scan(ScanKind::Webapp);

    {
        let state = app.state.read();
        assert!(state.board.is_in_flight(ScanKind::Subdomain));
        assert!(state.board.is_in_flight(ScanKind::Webapp));
    }

    settle_next(&mut app).await;
    settle_next(&mut app).await;

    let state = app.state.read();
    assert!(!state.board.any_in_flight());
    assert_eq!(state.board.result(ScanKind::Subdomain).unwrap().status, RunStatus::Success);
    assert_eq!(state.board.result(ScanKind::Webapp).unwrap().status, RunStatus::Success);
}

#[tokio::test]
async fn test_cancelled_run_ignores_late_settlement() {
    let server = MockServer::start().await;

    // Slow enough that cancellation lands first
    Mock::given(method("POST"))
        .and(path("/scan/idor"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut app = app_for(&server).await;
    app.start_scan(ScanKind::Idor);
    app.cancel_scan(ScanKind::Idor);

    let state = app.state.read();
    let result = state.board.result(ScanKind::Idor).unwrap();
    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.message, scandeck::scan::CANCELLED_MESSAGE);
    assert!(!state.board.is_in_flight(ScanKind::Idor));
    assert!(state.board.can_run(ScanKind::Idor, "example.com"));
}
