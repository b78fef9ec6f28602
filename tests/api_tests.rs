//! Tests for the HTTP API and the MCP JSON-RPC surface

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{context, FakeLedgerClient};
use hedera_agent_toolkit::{
    api::create_router,
    config::{AgentMode, Config},
    mcp::protocol::{error_codes, PROTOCOL_VERSION},
    tools::{core_plugins, Toolkit},
    AppState,
};

fn create_test_app(mode: AgentMode, account: Option<u64>) -> (Router, Arc<FakeLedgerClient>) {
    let client = Arc::new(FakeLedgerClient::new());
    let state = AppState {
        config: Arc::new(Config::default()),
        context: Arc::new(context(mode, account)),
        client: client.clone(),
        toolkit: Arc::new(Toolkit::new(core_plugins(None, None), None)),
    };
    (create_router(state), client)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn rpc(app: Router, method: &str, params: Value) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/rpc",
        Some(json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_reports_network_and_mode() {
    let (app, _) = create_test_app(AgentMode::ReturnBytes, Some(5001));
    let (status, body) = send(app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["network"], "testnet");
    assert_eq!(body["mode"], "returnBytes");
    assert_eq!(body["tools"], 23);
}

#[tokio::test]
async fn lists_tools_with_schemas() {
    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let (status, body) = send(app, Method::GET, "/api/tools", None).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 23);
    let transfer = tools.iter().find(|t| t["name"] == "transfer_hbar_tool").unwrap();
    assert_eq!(transfer["title"], "Transfer HBAR");
    assert_eq!(transfer["inputSchema"]["type"], "object");
}

#[tokio::test]
async fn calls_a_tool_over_http() {
    let (app, client) = create_test_app(AgentMode::Autonomous, Some(5001));
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tools/transfer_hbar_tool",
        Some(json!({ "transfers": [{ "accountId": "0.0.1001", "amount": 1 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "transfer_hbar_tool");
    assert_eq!(body["isError"], false);
    assert_eq!(body["result"]["raw"]["status"], 22);
    assert!(body["humanMessage"].as_str().unwrap().starts_with("HBAR successfully transferred."));
    assert_eq!(client.submissions().len(), 1);
}

#[tokio::test]
async fn tool_failures_are_200_with_is_error() {
    let (app, client) = create_test_app(AgentMode::ReturnBytes, None);
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tools/submit_topic_message_tool",
        Some(json!({ "topicId": "0.0.42", "message": "hi" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isError"], true);
    assert_eq!(body["result"], "Context account ID is required to return transaction bytes");
    assert!(client.submissions().is_empty());
}

#[tokio::test]
async fn unknown_tool_is_404_and_bad_json_is_400() {
    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let (status, body) = send(app, Method::POST, "/api/tools/mine_bitcoin", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown tool: mine_bitcoin");

    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/tools/transfer_hbar_tool")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rpc_initialize_and_list() {
    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let body = rpc(app, "initialize", json!({})).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(body["result"]["serverInfo"]["name"], "hedera_mcp");

    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let body = rpc(app, "tools/list", json!({})).await;
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 23);
}

#[tokio::test]
async fn rpc_tool_call_returns_text_and_structured_content() {
    let (app, client) = create_test_app(AgentMode::ReturnBytes, Some(5001));
    let body = rpc(
        app,
        "tools/call",
        json!({ "name": "create_topic_tool", "arguments": { "topicMemo": "news" } }),
    )
    .await;

    let result = &body["result"];
    assert_eq!(result["isError"], false);
    assert!(result["structuredContent"]["bytes"].as_str().unwrap().starts_with("0x"));
    assert_eq!(result["content"][0]["type"], "text");
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Unsigned transaction bytes: 0x"));
    assert!(client.submissions().is_empty());
}

#[tokio::test]
async fn rpc_tool_failure_is_a_result_not_an_error() {
    let (app, _) = create_test_app(AgentMode::Autonomous, Some(5001));
    let body = rpc(
        app,
        "tools/call",
        json!({ "name": "transfer_hbar_tool", "arguments": { "transfers": [{ "accountId": "0.0.1001", "amount": -5 }] } }),
    )
    .await;

    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["isError"], true);
    assert_eq!(body["result"]["content"][0]["text"], "Invalid transfer amount: -5");
}

#[tokio::test]
async fn rpc_tool_method_alias() {
    let (app, client) = create_test_app(AgentMode::Autonomous, Some(5001));
    let body = rpc(app, "submit_topic_message_tool", json!({ "topicId": "0.0.42", "message": "hi" })).await;

    assert_eq!(body["result"]["isError"], false);
    assert_eq!(client.submissions().len(), 1);
}

#[tokio::test]
async fn rpc_errors() {
    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let body = rpc(app, "resources/list", json!({})).await;
    assert_eq!(body["error"]["code"], error_codes::METHOD_NOT_FOUND);

    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let body = rpc(app, "tools/call", json!({ "name": "mine_bitcoin" })).await;
    assert_eq!(body["error"]["code"], error_codes::INVALID_PARAMS);
    assert_eq!(body["error"]["message"], "Unknown tool: mine_bitcoin");

    let (app, _) = create_test_app(AgentMode::Autonomous, None);
    let body = rpc(app, "tools/call", json!({ "arguments": {} })).await;
    assert_eq!(body["error"]["code"], error_codes::INVALID_PARAMS);
}
