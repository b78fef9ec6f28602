//! # MCP Handler Module
//!
//! Implements the Model Context Protocol on top of the toolkit. Requests
//! arrive as JSON-RPC 2.0 over stdio or over `POST /api/rpc`.
//!
//! ## Supported methods
//! - `initialize` - server info and capabilities
//! - `ping` - liveness
//! - `tools/list` - every tool in the toolkit with its input schema
//! - `tools/call` - run a tool by method name
//!
//! A tool method can also be called directly as the JSON-RPC method; it is
//! rewritten into `tools/call`.
//!
//! Tool failures are not JSON-RPC errors: they come back as a normal result
//! with `isError: true` and the failure message as text content.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    mcp::protocol::{error_codes, Request, Response, PROTOCOL_VERSION},
    tools::ToolOutput,
    utils, AppState,
};

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

fn tool_result(output: &ToolOutput) -> Value {
    let mut payload = json!({ "isError": output.is_error() });
    let structured = output.to_value();
    if structured.is_object() {
        payload["structuredContent"] = structured;
    }
    make_texty_result(output.human_message(), payload)
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        debug!("Ignoring notification {}", req.method);
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_tools_list(&req, &state),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience aliases: a tool method used directly as the RPC method
        method if state.toolkit.get(method).is_some() => {
            let wrapped = Request::new(
                req.id.clone(),
                "tools/call",
                Some(json!({
                    "name": method,
                    "arguments": utils::arguments_or_empty(req.params.as_ref())
                })),
            );
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the named tool.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name: String = match utils::get_required_arg(params, "name", &req.id) {
        Ok(name) => name,
        Err(resp) => return resp,
    };
    let args = utils::arguments_or_empty(params.get("arguments"));

    let output = match state
        .toolkit
        .execute(&tool_name, state.client.as_ref(), &state.context, args)
        .await
    {
        Some(output) => output,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", tool_name),
            )
        }
    };

    Response::success(req.id, tool_result(&output))
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "hedera_mcp",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions = "Hedera agent toolkit: create and manage accounts, tokens, topics and ERC20/ERC721 \
         contracts, and query the mirror node. Transactions are submitted or returned as unsigned bytes \
         depending on the configured mode.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request from the toolkit's own descriptions.
fn handle_tools_list(req: &Request, state: &AppState) -> Response {
    let tools = state.toolkit.describe(&state.context);
    Response::success(req.id.clone(), json!({ "tools": tools }))
}
