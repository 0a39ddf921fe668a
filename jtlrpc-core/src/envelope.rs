//! # jtlrpc Envelope
//!
//! Request and response envelopes of the `jtlrpc` protocol.
//!
//! A request travels as a single form field named `jtlrpc` holding this JSON document:
//!
//! ```json
//! {"method": "category.pull", "params": {"limit": 50}, "jtlrpc": "2.0", "id": "..."}
//! ```
//!
//! next to an optional `jtlauth` field carrying the session id. The response body is either
//! `{"result": ...}` or `{"error": {"message": "...", "code": 790}}`.
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Protocol version carried by every request.
pub const JTL_RPC_VERSION: &str = "2.0";

/// Form / multipart field holding the JSON envelope.
pub const RPC_FIELD: &str = "jtlrpc";
/// Form / multipart field holding the session id.
pub const AUTH_FIELD: &str = "jtlauth";

/// Generic failure, also used when the server omits the code.
pub const UNKNOWN_ERROR: i32 = 10;
/// An expected key is missing from an otherwise successful result.
pub const INDEX_NOT_FOUND: i32 = 20;
/// The token was rejected by the connector.
pub const AUTHENTICATION_FAILED: i32 = 790;
/// The session id is unknown or expired; the client re-authenticates once.
pub const SESSION_INVALID: i32 = -32000;

const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Error while fetching connector response";

/// An outgoing `jtlrpc` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default, skip_serializing_if = "params_are_empty")]
    pub params: Value,
    pub jtlrpc: String,
    pub id: String,
}

impl RpcRequest {
    /// Builds a request with a freshly generated id.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        build_request(Uuid::new_v4().simple().to_string(), method, params)
    }
}

/// Builds a request with an explicit id.
pub fn build_request(id: impl Into<String>, method: impl Into<String>, params: Value) -> RpcRequest {
    RpcRequest {
        method: method.into(),
        params,
        jtlrpc: JTL_RPC_VERSION.to_string(),
        id: id.into(),
    }
}

/// Serializes the envelope into the JSON text carried by the `jtlrpc` field.
pub fn serialize(request: &RpcRequest) -> Result<String, serde_json::Error> {
    serde_json::to_string(request)
}

/// Builds the form fields of a request: `jtlauth` when a session is held, then the envelope.
pub fn form_fields(
    request: &RpcRequest,
    session_id: Option<&str>,
) -> Result<Vec<(String, String)>, serde_json::Error> {
    let mut fields = Vec::with_capacity(2);
    if let Some(session_id) = session_id.filter(|id| !id.is_empty()) {
        fields.push((AUTH_FIELD.to_string(), session_id.to_string()));
    }
    fields.push((RPC_FIELD.to_string(), serialize(request)?));
    Ok(fields)
}

/// `params` is emitted only when it carries something.
fn params_are_empty(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// An error reported by the connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub message: String,
    pub code: i32,
}

impl RpcError {
    pub fn is_session_invalid(&self) -> bool {
        self.code == SESSION_INVALID
    }
}

/// A decoded `jtlrpc` response.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    Result(Value),
    Error(RpcError),
}

/// Decodes a raw response body.
///
/// An `error` member wins over `result`. It only counts when it is a non-empty object;
/// missing `message`/`code` fall back to a placeholder and [`UNKNOWN_ERROR`]. A `result`
/// member is returned as-is, even when it is `null` or `false`.
pub fn parse_response(body: &[u8]) -> Result<RpcResponse, ClientError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ClientError::MalformedResponse(format!("response body is not valid JSON: {e}"))
    })?;

    let Value::Object(mut envelope) = value else {
        return Err(ClientError::MalformedResponse(
            "response body is not a JSON object".to_string(),
        ));
    };

    if let Some(Value::Object(error)) = envelope.get("error")
        && !error.is_empty()
    {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string();
        let code = error
            .get("code")
            .and_then(coerce_code)
            .unwrap_or(UNKNOWN_ERROR);

        return Ok(RpcResponse::Error(RpcError { message, code }));
    }

    envelope
        .remove("result")
        .map(RpcResponse::Result)
        .ok_or_else(|| {
            ClientError::MalformedResponse(
                "Unknown error occurred while fetching response!".to_string(),
            )
        })
}

fn coerce_code(code: &Value) -> Option<i32> {
    match code {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|c| i32::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
