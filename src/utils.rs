//! Small helpers shared by the MCP and HTTP adapters.

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::mcp::protocol::{error_codes, Response};

/// Extracts a required argument from a JSON object, or builds the JSON-RPC error to return.
pub fn get_required_arg<T: DeserializeOwned>(args: &Value, key: &str, req_id: &Value) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

/// Treats a missing or `null` argument object as `{}`.
pub fn arguments_or_empty(args: Option<&Value>) -> Value {
    match args {
        Some(Value::Null) | None => Value::Object(Default::default()),
        Some(v) => v.clone(),
    }
}
