//! Ayd client and tools against a mock HTTP backend

mod common;

use std::time::Duration;

use ayd_mcp::ayd::{Backend, BackendError, Client, LogQuery, Status};
use ayd_mcp::mcp::{handlers, AydHandlers, Codec, Dispatcher, Server, ServerInfo};
use common::{MockAyd, Route, LOG, STATUS, TARGETS};
use serde_json::{json, Value};
use url::Url;

fn client(mock: &MockAyd) -> Client {
    Client::new(Url::parse(&mock.base_url).unwrap(), Duration::from_secs(5)).unwrap()
}

fn full_mock() -> MockAyd {
    MockAyd::start(vec![
        ("/targets.json", Route::json(TARGETS)),
        ("/status.json", Route::json(STATUS)),
        ("/log.json", Route::json(LOG)),
    ])
}

/// Send one `tools/call` through a real server wired to `mock`
fn call_tool(mock: &MockAyd, name: &str, arguments: Value) -> Value {
    let url = Url::parse(&mock.base_url).unwrap();
    let backend = Client::new(url.clone(), Duration::from_secs(5)).unwrap();
    let mut dispatcher = Dispatcher::new();
    handlers::register(
        &mut dispatcher,
        AydHandlers::new(Box::new(backend), url.as_str(), ServerInfo::default()),
    );

    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string();

    let mut out = Vec::new();
    Server::new(Codec::new(request.as_bytes(), &mut out), dispatcher)
        .serve()
        .unwrap();
    serde_json::from_slice(&out).unwrap()
}

fn tool_text(response: &Value) -> &str {
    assert_eq!(response["result"]["isError"], false, "{}", response);
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[test]
fn test_client_fetches_targets() {
    let mock = full_mock();
    let targets = client(&mock).targets().unwrap();
    assert_eq!(targets, vec!["https://b.example", "ping:a.example"]);
    assert_eq!(mock.requests(), vec!["/targets.json"]);
}

#[test]
fn test_client_fetches_report() {
    let mock = full_mock();
    let report = client(&mock).report().unwrap();
    assert_eq!(report.probe_history.len(), 2);
    let history = report.target("ping:a.example").unwrap();
    assert_eq!(history.status, Status::Failure);
    assert_eq!(history.latest().unwrap().message, "all packets lost");
}

#[test]
fn test_client_sends_log_filters() {
    let mock = full_mock();
    let query = LogQuery {
        query: "b.example HEALTHY".to_string(),
        since: "2024-05-01T00:00:00Z".to_string(),
        until: String::new(),
    };
    let records = client(&mock).log(&query).unwrap();
    assert_eq!(records.len(), 2);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let sent = Url::parse(&format!("http://x{}", requests[0])).unwrap();
    assert_eq!(sent.path(), "/log.json");
    let pairs: Vec<(String, String)> = sent.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("query".to_string(), "b.example HEALTHY".to_string()),
            ("since".to_string(), "2024-05-01T00:00:00Z".to_string()),
            ("until".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_client_reports_http_status() {
    let mock = MockAyd::start(vec![("/targets.json", Route::status(500))]);
    let err = client(&mock).targets().unwrap_err();
    assert!(matches!(err, BackendError::Status { .. }), "{}", err);
    assert!(!err.is_decode());
}

#[test]
fn test_client_reports_decode_failure() {
    let mock = MockAyd::start(vec![("/targets.json", Route::json("{\"not\":\"a list\"}"))]);
    let err = client(&mock).targets().unwrap_err();
    assert!(err.is_decode(), "{}", err);
}

#[test]
fn test_list_targets_tool() {
    let mock = MockAyd::start(vec![(
        "/targets.json",
        Route::json(r#"["ping:z.example","dns:a.example","https://m.example"]"#),
    )]);
    let response = call_tool(&mock, "listTargets", json!({}));
    assert_eq!(
        tool_text(&response),
        "dns:a.example\nhttps://m.example\nping:z.example"
    );
}

#[test]
fn test_status_overview_tool() {
    let mock = full_mock();
    let response = call_tool(&mock, "getStatusOverview", json!({}));
    assert_eq!(
        tool_text(&response),
        "Target <https://b.example> reported HEALTHY in 12.5ms at 2024-05-01T10:00:00+00:00\n\
         Target <ping:a.example> reported FAILURE in 1s at 2024-05-01T10:00:00+00:00"
    );
}

#[test]
fn test_target_status_tool() {
    let mock = full_mock();
    let response = call_tool(&mock, "getTargetStatus", json!({"uri": "https://b.example"}));
    let summary: Value = serde_json::from_str(tool_text(&response)).unwrap();
    assert_eq!(summary["uri"], "https://b.example");
    assert_eq!(summary["status"], "HEALTHY");
    assert_eq!(summary["last_log"]["message"], "200 OK");

    let response = call_tool(&mock, "getTargetStatus", json!({"uri": "https://gone.example"}));
    assert_eq!(tool_text(&response), "No such target: https://gone.example");
}

#[test]
fn test_read_log_tool() {
    let mock = full_mock();
    let response = call_tool(&mock, "readLog", json!({"query": "b.example"}));
    let lines: Vec<&str> = tool_text(&response).lines().collect();
    assert_eq!(lines.len(), 2);
    let last: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(last["latency"], 12.5);
    assert_eq!(last["target"], "https://b.example");
}

#[test]
fn test_backend_failure_is_internal_error() {
    let mock = MockAyd::start(vec![("/log.json", Route::status(503))]);
    let response = call_tool(&mock, "readLog", json!({}));
    assert_eq!(response["error"]["code"], -32603);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch log:"));

    let response = call_tool(&mock, "getStatusOverview", json!({}));
    assert_eq!(response["error"]["code"], -32603);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch status from Ayd:"));
}
