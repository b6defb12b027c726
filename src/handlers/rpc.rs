//! POST / - tool-invocation protocol.
//!
//! Body: `{"method": "tools/list"}` or
//! `{"method": "tools/call", "params": {"name": ..., "arguments": {...}}}`.

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::tools::{ToolCallEnvelope, ToolDescriptor, ToolResultEnvelope};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS_LIST: &str = "tools/list";
pub const TOOLS_CALL: &str = "tools/call";

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ToolListResponse<'a> {
    pub tools: &'a [ToolDescriptor],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RpcResponse<'a> {
    Tools(ToolListResponse<'a>),
    Result(ToolResultEnvelope),
}

/// POST / - Route `tools/list` and `tools/call`.
///
/// Malformed bodies and unknown methods are 400. Any error out of the
/// dispatcher is a dispatch fault and maps to 500.
pub async fn rpc_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RpcRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let response = match request.method.as_str() {
        TOOLS_LIST => RpcResponse::Tools(ToolListResponse {
            tools: state.registry.list_tools(),
        }),
        TOOLS_CALL => {
            let params = request
                .params
                .ok_or_else(|| AppError::BadRequest("tools/call requires params".to_string()))?;
            let call: ToolCallEnvelope = serde_json::from_value(params)
                .map_err(|e| AppError::BadRequest(format!("invalid tools/call params: {}", e)))?;

            RpcResponse::Result(state.dispatcher().invoke(&call).await?)
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "unsupported method '{}'",
                other
            )))
        }
    };

    Ok(Json(serde_json::to_value(response)?))
}

/// Any verb on / other than GET and POST.
pub async fn unsupported_verb(method: Method) -> AppError {
    AppError::BadRequest(format!("unsupported HTTP method {}", method))
}
